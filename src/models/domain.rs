use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Profile identifier as issued by the profile dataset
pub type ProfileId = u64;

/// Declares a closed enumeration whose wire form is its human label.
///
/// Generates `ALL`, `label()`, `Display`, `FromStr` (exact label match) and
/// serde impls that go through the label.
macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownLabel(other.to_string())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

/// A label that is not part of an enumerated domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

labeled_enum! {
    /// Training or career stage
    Level {
        Undergraduate => "Undergraduate",
        MedicalStudent => "Medical Student",
        Resident => "Resident",
        AttendingFaculty => "Attending/Faculty",
    }
}

labeled_enum! {
    /// Research specialty
    Specialty {
        Anesthesiology => "Anesthesiology",
        Cardiology => "Cardiology",
        CriticalCare => "Critical Care",
        Dermatology => "Dermatology",
        EmergencyMedicine => "Emergency Medicine",
        Endocrinology => "Endocrinology",
        FamilyMedicine => "Family Medicine",
        Gastroenterology => "Gastroenterology",
        GeneralSurgery => "General Surgery",
        Geriatrics => "Geriatrics",
        Hematology => "Hematology",
        InfectiousDisease => "Infectious Disease",
        InternalMedicine => "Internal Medicine",
        Nephrology => "Nephrology",
        Neurology => "Neurology",
        Neurosurgery => "Neurosurgery",
        ObstetricsGynecology => "Obstetrics & Gynecology",
        Oncology => "Oncology",
        Ophthalmology => "Ophthalmology",
        OrthopedicSurgery => "Orthopedic Surgery",
        Otolaryngology => "Otolaryngology (ENT)",
        Pathology => "Pathology",
        Pediatrics => "Pediatrics",
        PhysicalMedicine => "Physical Medicine & Rehabilitation",
        PlasticSurgery => "Plastic Surgery",
        Psychiatry => "Psychiatry",
        Pulmonology => "Pulmonology",
        Radiology => "Radiology",
        Rheumatology => "Rheumatology",
        Urology => "Urology",
        Bioengineering => "Bioengineering",
        BiomedicalSciences => "Biomedical Sciences",
        Epidemiology => "Epidemiology",
        Genetics => "Genetics",
        Immunology => "Immunology",
        Neuroscience => "Neuroscience",
        Pharmacology => "Pharmacology",
        PublicHealth => "Public Health",
        UnicornEngineering => "Unicorn Engineering",
    }
}

labeled_enum! {
    /// Coarse institution bucket, always visible in place of the exact institution
    InstitutionTier {
        Top5MedicalSchoolUs => "Top 5 Medical School (US)",
        Top10MedicalSchoolUs => "Top 10 Medical School (US)",
        Top20MedicalSchoolUs => "Top 20 Medical School (US)",
        Top50MedicalSchoolUs => "Top 50 Medical School (US)",
        UsMedicalSchool => "US Medical School",
        Top10UniversityUs => "Top 10 University (US)",
        Top50UniversityUs => "Top 50 University (US)",
        UsUniversity => "US University",
        RussellGroupUk => "Russell Group University (UK)",
        OxbridgeUk => "Oxbridge (UK)",
        CanadianUniversity => "Canadian University",
        EuropeanUniversity => "European University",
        AustralianUniversity => "Australian University",
        AsianUniversity => "Asian University",
        TopResearchInstitution => "Top Research Institution (International)",
        InternationalUniversity => "International University",
    }
}

labeled_enum! {
    /// Geographic region
    Region {
        NortheastUs => "Northeast US",
        SoutheastUs => "Southeast US",
        MidwestUs => "Midwest US",
        SouthwestUs => "Southwest US",
        WestCoastUs => "West Coast US",
        Canada => "Canada",
        UnitedKingdom => "United Kingdom",
        Europe => "Europe",
        Asia => "Asia",
        AustraliaOceania => "Australia/Oceania",
        LatinAmerica => "Latin America",
        MiddleEast => "Middle East",
        Africa => "Africa",
    }
}

/// Researcher profile as supplied by the read-only dataset
///
/// `full_name` and `institution` are gated: they only leave the crate through
/// [`crate::core::disclosure::present`] for a matched profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub display_name: String,
    pub full_name: String,
    pub level: Level,
    #[serde(default)]
    pub year: String,
    pub specialty: Specialty,
    pub institution_tier: InstitutionTier,
    pub institution: String,
    pub region: Region,
    #[serde(alias = "publications", default)]
    pub publication_count: u32,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub previous_projects: Vec<String>,
}

impl Profile {
    pub fn has_publications(&self) -> bool {
        self.publication_count > 0
    }
}

/// Optional filter constraints; `None` imposes no restriction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub level: Option<Level>,
    #[serde(default)]
    pub specialty: Option<Specialty>,
    #[serde(default)]
    pub institution_tier: Option<InstitutionTier>,
    #[serde(default)]
    pub region: Option<Region>,
    #[serde(default)]
    pub require_publications: bool,
}

impl FilterCriteria {
    /// True when no constraint is set and filtering is the identity
    pub fn is_unrestricted(&self) -> bool {
        self.level.is_none()
            && self.specialty.is_none()
            && self.institution_tier.is_none()
            && self.region.is_none()
            && !self.require_publications
    }
}

/// What a caller is allowed to see of a profile
///
/// Has no field of its own for the full name or the exact institution;
/// `name` and `affiliation` carry them only when `matched`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosedProfile {
    pub id: ProfileId,
    pub name: String,
    pub display_name: String,
    pub initials: String,
    pub affiliation: String,
    pub institution_tier: InstitutionTier,
    pub region: Region,
    pub level: Level,
    pub year: String,
    pub specialty: Specialty,
    pub publication_count: u32,
    pub verified: bool,
    pub bio: String,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub previous_projects: Vec<String>,
    pub matched: bool,
}

/// Recorded match; never removed once inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub profile_id: ProfileId,
    pub matched_at: chrono::DateTime<chrono::Utc>,
}

/// Quota policy of the requesting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Free,
    Premium,
}

/// Free-request accounting for one billing period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaState {
    pub tier: Tier,
    pub free_requests_used: u32,
    pub free_requests_limit: u32,
}

impl QuotaState {
    pub fn new(tier: Tier, free_requests_limit: u32) -> Self {
        Self {
            tier,
            free_requests_used: 0,
            free_requests_limit,
        }
    }
}

/// Free requests left in the current period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "count", rename_all = "lowercase")]
pub enum RemainingFree {
    Limited(u32),
    Unlimited,
}

/// Classification of a match request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchOutcome {
    AlreadyMatched,
    ConfirmedFree,
    ConfirmedPaid,
}

/// Scroll/viewport signal delivered by the hosting environment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollSignal {
    pub offset: f64,
    #[serde(default)]
    pub viewport_height: f64,
    #[serde(default)]
    pub page_height: f64,
}
