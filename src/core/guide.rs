// CropCure - core/guide.rs
//
// Static disease guide content, grouped by crop.

/// One documented disease.
#[derive(Debug)]
pub struct DiseaseArticle {
    pub name: &'static str,
    pub pathogen: &'static str,
    pub summary: &'static str,
    pub symptoms: &'static [&'static str],
    pub treatment: &'static [&'static str],
}

/// Crops with a guide tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Crop {
    #[default]
    Rice,
    Wheat,
    Corn,
}

impl Crop {
    pub fn all() -> &'static [Crop] {
        &[Crop::Rice, Crop::Wheat, Crop::Corn]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Crop::Rice => "Rice",
            Crop::Wheat => "Wheat",
            Crop::Corn => "Corn",
        }
    }

    /// Articles for this crop; empty when the crop is not covered yet.
    pub fn articles(&self) -> &'static [DiseaseArticle] {
        match self {
            Crop::Rice => RICE_ARTICLES,
            Crop::Wheat | Crop::Corn => &[],
        }
    }
}

static RICE_ARTICLES: &[DiseaseArticle] = &[
    DiseaseArticle {
        name: "Bacterial Leaf Blight",
        pathogen: "Xanthomonas oryzae pv. oryzae",
        summary: "Bacterial leaf blight is a destructive bacterial disease of rice. \
                  It causes wilting of seedlings and yellowing and drying of leaves.",
        symptoms: &[
            "Water-soaked lesions on leaf margins",
            "Lesions turn yellow to white as they develop",
            "Leaves dry out and die",
        ],
        treatment: &[
            "Use resistant varieties",
            "Apply copper-based bactericides",
            "Maintain field hygiene",
            "Ensure proper drainage",
        ],
    },
    DiseaseArticle {
        name: "Brown Spot",
        pathogen: "Cochliobolus miyabeanus",
        summary: "Brown spot is a fungal disease that affects rice plants at all growth \
                  stages. It is one of the most prevalent rice diseases.",
        symptoms: &[
            "Circular to oval brown lesions",
            "Lesions have gray centers and dark brown margins",
            "Seedling blight if infection occurs early",
        ],
        treatment: &[
            "Use fungicides containing propiconazole or azoxystrobin",
            "Ensure balanced nutrition (especially potassium)",
            "Use disease-free seeds",
            "Proper spacing of plants for good air circulation",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::DiseaseLabel;

    #[test]
    fn test_rice_articles_name_known_labels() {
        let articles = Crop::Rice.articles();
        assert_eq!(articles.len(), 2);
        for article in articles {
            assert!(
                DiseaseLabel::from_label(article.name).is_some(),
                "guide article '{}' has no matching label",
                article.name
            );
            assert!(!article.symptoms.is_empty());
            assert!(!article.treatment.is_empty());
        }
    }

    #[test]
    fn test_uncovered_crops_are_empty() {
        assert!(Crop::Wheat.articles().is_empty());
        assert!(Crop::Corn.articles().is_empty());
    }
}
