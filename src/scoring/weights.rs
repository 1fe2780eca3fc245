use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The ten weighted scoring categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Cost,
    Housing,
    Stem,
    Work,
    Adaptation,
    Quality,
    Climate,
    StudentLife,
    Bureaucracy,
    EmotionalFit,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Cost,
        Category::Housing,
        Category::Stem,
        Category::Work,
        Category::Adaptation,
        Category::Quality,
        Category::Climate,
        Category::StudentLife,
        Category::Bureaucracy,
        Category::EmotionalFit,
    ];

    /// Key of the matching field in a serialized `Weights` record.
    pub fn weight_key(&self) -> &'static str {
        match self {
            Category::Cost => "totalCost",
            Category::Housing => "housing",
            Category::Stem => "stemStrength",
            Category::Work => "workOpportunities",
            Category::Adaptation => "languageAdaptation",
            Category::Quality => "qualityOfLife",
            Category::Climate => "climate",
            Category::StudentLife => "studentLife",
            Category::Bureaucracy => "bureaucracyEase",
            Category::EmotionalFit => "emotionalFit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Cost => "Total cost",
            Category::Housing => "Housing",
            Category::Stem => "STEM strength",
            Category::Work => "Work opportunities",
            Category::Adaptation => "Language & adaptation",
            Category::Quality => "Quality of life",
            Category::Climate => "Climate",
            Category::StudentLife => "Student life",
            Category::Bureaucracy => "Bureaucracy ease",
            Category::EmotionalFit => "Emotional fit",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the weight key in camelCase, snake_case or kebab-case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        Category::ALL
            .into_iter()
            .find(|category| category.weight_key().to_lowercase() == wanted)
            .ok_or_else(|| {
                let keys: Vec<_> = Category::ALL.iter().map(|c| c.weight_key()).collect();
                format!("unknown weight '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

/// Ten non-negative coefficients, conventionally 0-10 but not clamped.
/// Fields missing from a serialized record read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default = "Weights::zero")]
pub struct Weights {
    pub total_cost: f64,
    pub housing: f64,
    pub stem_strength: f64,
    pub work_opportunities: f64,
    pub language_adaptation: f64,
    pub quality_of_life: f64,
    pub climate: f64,
    pub student_life: f64,
    pub bureaucracy_ease: f64,
    pub emotional_fit: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            total_cost: 8.0,
            housing: 6.0,
            stem_strength: 9.0,
            work_opportunities: 5.0,
            language_adaptation: 6.0,
            quality_of_life: 7.0,
            climate: 4.0,
            student_life: 5.0,
            bureaucracy_ease: 4.0,
            emotional_fit: 7.0,
        }
    }
}

impl Weights {
    pub fn zero() -> Self {
        Self::uniform(0.0)
    }

    pub fn uniform(value: f64) -> Self {
        Self {
            total_cost: value,
            housing: value,
            stem_strength: value,
            work_opportunities: value,
            language_adaptation: value,
            quality_of_life: value,
            climate: value,
            student_life: value,
            bureaucracy_ease: value,
            emotional_fit: value,
        }
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Cost => self.total_cost,
            Category::Housing => self.housing,
            Category::Stem => self.stem_strength,
            Category::Work => self.work_opportunities,
            Category::Adaptation => self.language_adaptation,
            Category::Quality => self.quality_of_life,
            Category::Climate => self.climate,
            Category::StudentLife => self.student_life,
            Category::Bureaucracy => self.bureaucracy_ease,
            Category::EmotionalFit => self.emotional_fit,
        }
    }

    pub fn set(&mut self, category: Category, value: f64) {
        let slot = match category {
            Category::Cost => &mut self.total_cost,
            Category::Housing => &mut self.housing,
            Category::Stem => &mut self.stem_strength,
            Category::Work => &mut self.work_opportunities,
            Category::Adaptation => &mut self.language_adaptation,
            Category::Quality => &mut self.quality_of_life,
            Category::Climate => &mut self.climate,
            Category::StudentLife => &mut self.student_life,
            Category::Bureaucracy => &mut self.bureaucracy_ease,
            Category::EmotionalFit => &mut self.emotional_fit,
        };
        *slot = value;
    }

    pub fn with(mut self, category: Category, value: f64) -> Self {
        self.set(category, value);
        self
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        let mut scaled = *self;
        for category in Category::ALL {
            scaled.set(category, self.get(category) * factor);
        }
        scaled
    }
}

/// A named, persisted snapshot of a `Weights` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightPreset {
    pub id: String,
    pub name: String,
    pub weights: Weights,
}

impl WeightPreset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, weights: Weights) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weights,
        }
    }
}

/// Presets every fresh state starts with.
pub fn default_presets() -> Vec<WeightPreset> {
    let w = |values: [f64; 10]| {
        let mut weights = Weights::zero();
        for (category, value) in Category::ALL.into_iter().zip(values) {
            weights.set(category, value);
        }
        weights
    };

    vec![
        WeightPreset::new(
            "cost-focused",
            "Priority: cost",
            w([10.0, 9.0, 5.0, 4.0, 5.0, 5.0, 3.0, 3.0, 3.0, 5.0]),
        ),
        WeightPreset::new(
            "stem-focused",
            "Priority: STEM",
            w([5.0, 4.0, 10.0, 7.0, 4.0, 5.0, 3.0, 4.0, 3.0, 6.0]),
        ),
        WeightPreset::new(
            "career-focused",
            "Priority: career",
            w([4.0, 3.0, 8.0, 10.0, 5.0, 5.0, 2.0, 4.0, 3.0, 5.0]),
        ),
        WeightPreset::new("balanced", "Balanced", Weights::default()),
    ]
}
