// WordNet Domains: a curated 48-topic taxonomy with a 158-phrase
// hypothesis vocabulary underneath it.
//
// Many domains are too broad to make a good NLI hypothesis ("sport"), so the
// model is asked about specific fields ("badminton", "rowing", ...) and the
// mapping head folds them back into the domain.

use std::sync::Arc;

use anyhow::Result;

use crate::classify::aggregator::MappingAggregator;
use crate::classify::mapping::TopicMapping;
use crate::nli::traits::NliModel;

pub const QUERY_PHRASE: &str = "The domain of the sentence is about";

/// Entailment column of roberta-large-mnli.
pub const ENTAILMENT_POSITION: usize = 2;

/// The coarse domains, in output column order.
pub const WNDOMAINS_TOPICS: [&str; 48] = [
    "play",
    "tourism",
    "politics",
    "alimentation",
    "astrology",
    "biology",
    "history",
    "physics",
    "pedagogy",
    "color",
    "medicine",
    "psychology",
    "commerce",
    "fashion",
    "anthropology",
    "astronomy",
    "mathematics",
    "administration",
    "agriculture",
    "computer science",
    "earth",
    "law",
    "number",
    "archaeology",
    "literature",
    "time period",
    "quality",
    "engineering",
    "architecture",
    "veterinary",
    "military",
    "transport",
    "body care",
    "metrology",
    "industry",
    "chemistry",
    "telecommunication",
    "art",
    "sexuality",
    "sport",
    "religion",
    "person",
    "philosophy",
    "linguistics",
    "publishing",
    "artisanship",
    "sociology",
    "economy",
];

/// Hypothesis phrase -> domain, in fine column order.
pub const WNDOMAINS_TOPIC_MAPPING: [(&str, &str); 158] = [
    ("acoustics", "physics"),
    ("administration", "administration"),
    ("aeronautic", "transport"),
    ("agriculture", "agriculture"),
    ("alimentation", "alimentation"),
    ("anatomy", "biology"),
    ("anthropology", "anthropology"),
    ("archaeology", "archaeology"),
    ("archery", "sport"),
    ("architecture", "architecture"),
    ("art", "art"),
    ("artisanship", "artisanship"),
    ("astrology", "astrology"),
    ("astronautics", "engineering"),
    ("astronomy", "astronomy"),
    ("athletics", "sport"),
    ("atomic physic", "physics"),
    ("auto", "transport"),
    ("badminton", "sport"),
    ("banking", "economy"),
    ("baseball", "sport"),
    ("basketball", "sport"),
    ("betting", "play"),
    ("biochemistry", "biology"),
    ("biology", "biology"),
    ("body care", "body care"),
    ("book keeping", "economy"),
    ("botany", "biology"),
    ("bowling", "sport"),
    ("boxing", "sport"),
    ("building industry", "architecture"),
    ("card", "play"),
    ("chemistry", "chemistry"),
    ("chess", "play"),
    ("cinema", "telecommunication"),
    ("color", "color"),
    ("commerce", "commerce"),
    ("computer science", "computer science"),
    ("cricket", "sport"),
    ("cycling", "sport"),
    ("dance", "art"),
    ("dentistry", "medicine"),
    ("diplomacy", "politics"),
    ("diving", "sport"),
    ("drawing", "art"),
    ("earth", "earth"),
    ("ecology", "biology"),
    ("economy", "economy"),
    ("electricity", "physics"),
    ("electronics", "physics"),
    ("electrotechnics", "engineering"),
    ("engineering", "engineering"),
    ("enterprise", "economy"),
    ("entomology", "biology"),
    ("ethnology", "anthropology"),
    ("exchange", "economy"),
    ("fashion", "fashion"),
    ("fencing", "sport"),
    ("fishing", "sport"),
    ("folklore", "anthropology"),
    ("football", "sport"),
    ("furniture", "architecture"),
    ("gas", "physics"),
    ("gastronomy", "alimentation"),
    ("genetics", "biology"),
    ("geography", "earth"),
    ("geology", "earth"),
    ("geometry", "mathematics"),
    ("golf", "sport"),
    ("grammar", "linguistics"),
    ("heraldry", "history"),
    ("history", "history"),
    ("hockey", "sport"),
    ("hunting", "sport"),
    ("hydraulics", "engineering"),
    ("industry", "industry"),
    ("insurance", "economy"),
    ("jewellery", "art"),
    ("law", "law"),
    ("linguistics", "linguistics"),
    ("literature", "literature"),
    ("mathematics", "mathematics"),
    ("mechanics", "engineering"),
    ("medicine", "medicine"),
    ("merchant navy", "transport"),
    ("meteorology", "earth"),
    ("metrology", "metrology"),
    ("military", "military"),
    ("money", "economy"),
    ("mountaineering", "sport"),
    ("music", "art"),
    ("mythology", "religion"),
    ("number", "number"),
    ("numismatics", "art"),
    ("occultism", "religion"),
    ("oceanography", "earth"),
    ("optics", "physics"),
    ("painting", "art"),
    ("paleontology", "earth"),
    ("pedagogy", "pedagogy"),
    ("person", "person"),
    ("pharmacy", "medicine"),
    ("philately", "art"),
    ("philology", "literature"),
    ("philosophy", "philosophy"),
    ("photography", "art"),
    ("physics", "physics"),
    ("physiology", "biology"),
    ("plastic arts", "art"),
    ("play", "play"),
    ("politics", "politics"),
    ("post", "telecommunication"),
    ("psychiatry", "medicine"),
    ("psychoanalysis", "psychology"),
    ("psychology", "psychology"),
    ("publishing", "publishing"),
    ("quality", "quality"),
    ("racing", "sport"),
    ("radio", "telecommunication"),
    ("radiology", "medicine"),
    ("railway", "transport"),
    ("religion", "religion"),
    ("roman catholic", "religion"),
    ("rowing", "sport"),
    ("rugby", "sport"),
    ("school", "pedagogy"),
    ("sculpture", "art"),
    ("sexuality", "sexuality"),
    ("skating", "sport"),
    ("skiing", "sport"),
    ("soccer", "sport"),
    ("sociology", "sociology"),
    ("sport", "sport"),
    ("statistics", "mathematics"),
    ("sub", "sport"),
    ("surgery", "medicine"),
    ("swimming", "sport"),
    ("table tennis", "sport"),
    ("tax", "economy"),
    ("telecommunication", "telecommunication"),
    ("telegraphy", "telecommunication"),
    ("telephony", "telecommunication"),
    ("tennis", "sport"),
    ("textiles", "industry"),
    ("theatre", "art"),
    ("theology", "religion"),
    ("time period", "time period"),
    ("topography", "astronomy"),
    ("tourism", "tourism"),
    ("town planning", "architecture"),
    ("transport", "transport"),
    ("tv", "telecommunication"),
    ("university", "pedagogy"),
    ("veterinary", "veterinary"),
    ("volleyball", "sport"),
    ("wrestling", "sport"),
    ("zoology", "biology"),
    ("zootechnics", "veterinary"),
];

pub fn wndomains_topics() -> Vec<String> {
    WNDOMAINS_TOPICS.iter().map(|t| t.to_string()).collect()
}

pub fn wndomains_mapping() -> Result<TopicMapping> {
    TopicMapping::new(WNDOMAINS_TOPIC_MAPPING)
}

/// A classifier over the WordNet Domains taxonomy.
pub fn wndomains_classifier(model: Arc<dyn NliModel>) -> Result<MappingAggregator> {
    MappingAggregator::new(
        model,
        wndomains_topics(),
        wndomains_mapping()?,
        QUERY_PHRASE,
        ENTAILMENT_POSITION,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_domain_has_a_hypothesis() {
        let columns = wndomains_mapping()
            .unwrap()
            .inverse_index(&wndomains_topics())
            .unwrap();
        assert_eq!(columns.len(), WNDOMAINS_TOPICS.len());
        assert!(columns.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn test_sport_collects_many_fine_topics() {
        let mapping = wndomains_mapping().unwrap();
        let sport = mapping.iter().filter(|(_, c)| *c == "sport").count();
        assert!(sport > 20, "expected the sport domain to be broad, got {sport}");
        assert_eq!(mapping.coarse_of("rugby"), Some("sport"));
        assert_eq!(mapping.coarse_of("cinema"), Some("telecommunication"));
    }
}
