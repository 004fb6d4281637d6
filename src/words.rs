//! Static category → word list table consumed at session creation.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Category used when a requested one is unknown
pub const DEFAULT_CATEGORY: &str = "comida";

const WORD_LISTS: &[(&str, &[&str])] = &[
    (
        "comida",
        &[
            "tacos",
            "pozole",
            "tamales",
            "mole",
            "quesadillas",
            "enchiladas",
            "chilaquiles",
            "torta ahogada",
            "cochinita pibil",
            "chiles en nogada",
        ],
    ),
    (
        "lugares",
        &[
            "zócalo",
            "teotihuacán",
            "chichén itzá",
            "xochimilco",
            "chapultepec",
            "palenque",
            "tulum",
            "guanajuato",
            "taxco",
            "oaxaca",
        ],
    ),
    (
        "tradiciones",
        &[
            "día de muertos",
            "quinceañera",
            "mariachi",
            "lucha libre",
            "piñata",
            "posadas",
            "grito de independencia",
            "charreada",
            "jaripeo",
            "danza de los voladores",
        ],
    ),
    (
        "personajes",
        &[
            "frida kahlo",
            "diego rivera",
            "cantinflas",
            "chespirito",
            "pedro infante",
            "juan gabriel",
            "chavela vargas",
            "octavio paz",
            "sor juana",
            "emiliano zapata",
        ],
    ),
    (
        "objetos",
        &[
            "sarape",
            "sombrero",
            "molcajete",
            "comal",
            "metate",
            "rebozo",
            "huaraches",
            "calavera",
            "alebrije",
            "papel picado",
        ],
    ),
];

/// Lookup table of categories and their candidate words
#[derive(Debug, Clone)]
pub struct WordCatalog {
    lists: Vec<(String, Vec<String>)>,
    default_category: Option<String>,
}

impl Default for WordCatalog {
    fn default() -> Self {
        Self::builtin(Some(DEFAULT_CATEGORY.to_string()))
    }
}

impl WordCatalog {
    /// The built-in Mexican-themed lists
    pub fn builtin(default_category: Option<String>) -> Self {
        let lists = WORD_LISTS
            .iter()
            .map(|(tag, words)| {
                (
                    tag.to_string(),
                    words.iter().map(|w| w.to_string()).collect(),
                )
            })
            .collect();
        Self::new(lists, default_category)
    }

    /// Build a catalog from arbitrary lists; empty lists are dropped
    pub fn new(lists: Vec<(String, Vec<String>)>, default_category: Option<String>) -> Self {
        let lists = lists
            .into_iter()
            .filter(|(_, words)| !words.is_empty())
            .collect();
        Self {
            lists,
            default_category,
        }
    }

    /// Category tags in declaration order
    pub fn categories(&self) -> Vec<String> {
        self.lists.iter().map(|(tag, _)| tag.clone()).collect()
    }

    pub fn words(&self, category: &str) -> Option<&[String]> {
        self.lists
            .iter()
            .find(|(tag, _)| tag == category)
            .map(|(_, words)| words.as_slice())
    }

    /// Resolve a requested category, falling back to the default.
    /// Returns the category actually used.
    pub fn resolve(&self, category: &str) -> Option<&str> {
        let requested = category.trim().to_lowercase();
        if let Some((tag, _)) = self.lists.iter().find(|(tag, _)| *tag == requested) {
            return Some(tag);
        }
        let fallback = self.default_category.as_deref()?;
        self.lists
            .iter()
            .find(|(tag, _)| tag == fallback)
            .map(|(tag, _)| tag.as_str())
    }

    /// Pick a word uniformly from the resolved category
    pub fn pick<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> Option<(String, String)> {
        let tag = self.resolve(category)?;
        let word = self.words(tag)?.choose(rng)?;
        Some((tag.to_string(), word.clone()))
    }
}
