//! Best-effort country detection for free-text addresses.
//!
//! A small evidence-scoring classifier: postal-code shapes and place-name
//! keywords add weight to candidate countries and the highest total wins.
//! Five-, six- and seven-digit postal codes are shared across countries and
//! only count when a keyword for the same country corroborates them (or, for
//! Israel, when the code trails the whole address). With no dominant signal
//! the home country is assumed.
//!
//! The `RULES` table is the single source of truth for the classifier; test
//! fixtures are written against it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Country {
    Usa,
    Uk,
    Canada,
    Australia,
    France,
    Germany,
    Italy,
    Mexico,
    India,
    Israel,
}

/// Country assumed when nothing else dominates.
pub const HOME_COUNTRY: Country = Country::Usa;

const POSTAL_WEIGHT: u32 = 10;
const KEYWORD_WEIGHT: u32 = 10;
const CORROBORATED_POSTAL_WEIGHT: u32 = 5;
const TRAILING_CODE_WEIGHT: u32 = 10;
const MIN_WINNING_SCORE: u32 = 10;

impl Country {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Country::Usa => "USA",
            Country::Uk => "UK",
            Country::Canada => "Canada",
            Country::Australia => "Australia",
            Country::France => "France",
            Country::Germany => "Germany",
            Country::Italy => "Italy",
            Country::Mexico => "Mexico",
            Country::India => "India",
            Country::Israel => "Israel",
        }
    }

    /// Recognise an explicit country mention such as `"United Kingdom"` or
    /// `"USA"`.
    #[must_use]
    pub fn from_name(text: &str) -> Option<Self> {
        let norm = normalize(text);
        let country = match norm.as_str() {
            "usa" | "us" | "united states" | "united states of america" => Country::Usa,
            "uk" | "united kingdom" | "great britain" | "england" | "scotland" | "wales" => {
                Country::Uk
            }
            "canada" => Country::Canada,
            "australia" => Country::Australia,
            "france" => Country::France,
            "germany" | "deutschland" => Country::Germany,
            "italy" | "italia" => Country::Italy,
            "mexico" | "méxico" => Country::Mexico,
            "india" => Country::India,
            "israel" => Country::Israel,
            _ => return None,
        };
        Some(country)
    }

    /// Postal-code pattern used when extracting a code for this country.
    pub(crate) fn postal_regex(self) -> &'static Regex {
        match self {
            Country::Usa => &*US_ZIP,
            Country::Uk => &*UK_POSTCODE_ANY_CASE,
            Country::Canada => &*CA_POSTAL_ANY_CASE,
            Country::Australia => &*FOUR_DIGIT,
            Country::France | Country::Germany | Country::Italy | Country::Mexico => &*FIVE_DIGIT,
            Country::India => &*SIX_DIGIT,
            Country::Israel => &*SEVEN_DIGIT,
        }
    }
}

impl std::fmt::Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which shared digit-count postal code a country uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SharedPostal {
    FiveDigit,
    SixDigit,
    SevenDigit,
}

struct CountryRule {
    country: Country,
    /// Postal shape no other listed country uses.
    unique_postal: Option<&'static LazyLock<Regex>>,
    shared_postal: Option<SharedPostal>,
    /// Normalized place names and region markers.
    keywords: &'static [&'static str],
}

static US_ZIP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").expect("valid regex"));
static US_ZIP_PLUS_FOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5}-\d{4}\b").expect("valid regex"));
static US_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[,\s])(?:AL|AK|AZ|AR|CA|CO|CT|DE|DC|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY)\s+\d{5}(?:-\d{4})?\b",
    )
    .expect("valid regex")
});
static UK_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2}\b").expect("valid regex")
});
static UK_POSTCODE_ANY_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Z]{1,2}\d[A-Z\d]?\s*\d[A-Z]{2}\b").expect("valid regex")
});
static CA_POSTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]\d[A-Z]\s?\d[A-Z]\d\b").expect("valid regex"));
static CA_POSTAL_ANY_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[A-Z]\d[A-Z]\s?\d[A-Z]\d\b").expect("valid regex"));
static AU_STATE_POSTCODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:NSW|VIC|QLD|TAS|ACT|NT)\s+\d{4}\b").expect("valid regex")
});
static FOUR_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("valid regex"));
static FIVE_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{5}\b").expect("valid regex"));
static SIX_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{6}\b").expect("valid regex"));
static SEVEN_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{7}\b").expect("valid regex"));
static TRAILING_SEVEN_DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{7}\s*$").expect("valid regex"));

static RULES: &[CountryRule] = &[
    CountryRule {
        country: Country::Usa,
        unique_postal: Some(&US_ZIP_PLUS_FOUR),
        shared_postal: Some(SharedPostal::FiveDigit),
        keywords: &[
            "usa", "united states", "new york", "los angeles", "chicago", "houston",
            "phoenix", "philadelphia", "san antonio", "san diego", "dallas", "austin",
            "seattle", "boston", "san francisco", "denver", "miami", "atlanta",
            "portland", "las vegas", "nashville", "new orleans", "brooklyn",
            "manhattan", "new mexico",
        ],
    },
    CountryRule {
        country: Country::Uk,
        unique_postal: Some(&UK_POSTCODE),
        shared_postal: None,
        keywords: &[
            "uk", "united kingdom", "england", "scotland", "wales", "london",
            "manchester", "birmingham", "liverpool", "leeds", "glasgow", "edinburgh",
            "bristol", "cardiff", "belfast",
        ],
    },
    CountryRule {
        country: Country::Canada,
        unique_postal: Some(&CA_POSTAL),
        shared_postal: None,
        keywords: &[
            "canada", "toronto", "vancouver", "montreal", "montréal", "calgary",
            "ottawa", "edmonton", "winnipeg", "ontario", "quebec", "québec",
            "british columbia", "alberta",
        ],
    },
    CountryRule {
        country: Country::Australia,
        unique_postal: Some(&AU_STATE_POSTCODE),
        shared_postal: None,
        keywords: &[
            "australia", "sydney", "melbourne", "brisbane", "perth", "adelaide",
            "canberra", "hobart", "new south wales", "queensland",
        ],
    },
    CountryRule {
        country: Country::France,
        unique_postal: None,
        shared_postal: Some(SharedPostal::FiveDigit),
        keywords: &[
            "france", "paris", "lyon", "marseille", "toulouse", "nice", "bordeaux",
            "lille", "nantes", "strasbourg", "rue",
        ],
    },
    CountryRule {
        country: Country::Germany,
        unique_postal: None,
        shared_postal: Some(SharedPostal::FiveDigit),
        keywords: &[
            "germany", "deutschland", "berlin", "münchen", "munich", "hamburg", "köln",
            "cologne", "frankfurt", "stuttgart", "düsseldorf", "straße", "strasse",
        ],
    },
    CountryRule {
        country: Country::Italy,
        unique_postal: None,
        shared_postal: Some(SharedPostal::FiveDigit),
        keywords: &[
            "italy", "italia", "roma", "rome", "milano", "milan", "napoli", "naples",
            "torino", "turin", "firenze", "florence", "venezia", "venice", "bologna",
            "via", "piazza",
        ],
    },
    CountryRule {
        country: Country::Mexico,
        unique_postal: None,
        shared_postal: Some(SharedPostal::FiveDigit),
        keywords: &[
            "mexico", "méxico", "cdmx", "guadalajara", "monterrey", "puebla", "cancún",
            "cancun", "tijuana", "colonia",
        ],
    },
    CountryRule {
        country: Country::India,
        unique_postal: None,
        shared_postal: Some(SharedPostal::SixDigit),
        keywords: &[
            "india", "mumbai", "delhi", "new delhi", "bangalore", "bengaluru",
            "chennai", "kolkata", "hyderabad", "pune", "ahmedabad", "jaipur",
        ],
    },
    CountryRule {
        country: Country::Israel,
        unique_postal: None,
        shared_postal: Some(SharedPostal::SevenDigit),
        keywords: &[
            "israel", "tel aviv", "jerusalem", "haifa", "eilat", "beersheba", "netanya",
        ],
    },
];

/// Evidence score per country, in rule order. Countries with no evidence
/// are included with a score of zero.
#[must_use]
pub fn country_scores(text: &str) -> Vec<(Country, u32)> {
    let padded = format!(" {} ", normalize(text));
    let has_five = FIVE_DIGIT.is_match(text);
    let has_six = SIX_DIGIT.is_match(text);
    let has_seven = SEVEN_DIGIT.is_match(text);

    RULES
        .iter()
        .map(|rule| {
            let mut keyword_score = 0;
            for keyword in rule.keywords {
                if padded.contains(&format!(" {keyword} ")) {
                    keyword_score += KEYWORD_WEIGHT;
                }
            }
            if rule.country == Country::Usa && US_STATE_ZIP.is_match(text) {
                keyword_score += KEYWORD_WEIGHT;
            }

            let mut score = keyword_score;
            if rule.unique_postal.is_some_and(|re| re.is_match(text)) {
                score += POSTAL_WEIGHT;
            }

            let shared_present = match rule.shared_postal {
                Some(SharedPostal::FiveDigit) => has_five,
                Some(SharedPostal::SixDigit) => has_six,
                Some(SharedPostal::SevenDigit) => has_seven,
                None => false,
            };
            if shared_present && keyword_score > 0 {
                score += CORROBORATED_POSTAL_WEIGHT;
            }
            if rule.country == Country::Israel && TRAILING_SEVEN_DIGIT.is_match(text) {
                score += TRAILING_CODE_WEIGHT;
            }

            (rule.country, score)
        })
        .collect()
}

/// Guess the country an address belongs to. Falls back to
/// [`HOME_COUNTRY`] when no country reaches the minimum evidence score.
/// Ties go to the earlier rule, which puts the home country first.
#[must_use]
pub fn detect_country(text: &str) -> Country {
    let mut best = (HOME_COUNTRY, 0);
    for (country, score) in country_scores(text) {
        if score > best.1 {
            best = (country, score);
        }
    }
    if best.1 >= MIN_WINNING_SCORE {
        best.0
    } else {
        HOME_COUNTRY
    }
}
