// NLI model access: trait-based so the classifier never touches ONNX directly.
//
// The NliModel trait defines the capability (separator, encode, infer).
// OnnxNliModel implements it with ONNX Runtime and a HuggingFace tokenizer;
// download fetches the files it needs.

pub mod download;
pub mod onnx;
pub mod traits;
