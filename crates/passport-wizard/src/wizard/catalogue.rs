use super::domain::{Country, UniversityId, UniversityOption};
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub country: Country,
    pub description: &'static str,
}

impl CatalogueEntry {
    fn to_option(&self) -> UniversityOption {
        UniversityOption {
            id: UniversityId(self.id.to_string()),
            name: self.name.to_string(),
            country: self.country,
            description: self.description.to_string(),
            selected: false,
        }
    }
}

/// Immutable country -> university lookup table shared by every wizard session.
#[derive(Debug)]
pub struct UniversityCatalogue {
    entries: Vec<CatalogueEntry>,
}

impl UniversityCatalogue {
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<UniversityCatalogue> = OnceLock::new();
        STANDARD.get_or_init(|| Self {
            entries: standard_entries(),
        })
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }

    pub fn universities_for(&self, country: Country) -> Vec<&CatalogueEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.country == country)
            .collect()
    }

    /// Builds a fresh working list for the given countries, in the order supplied, with
    /// nothing selected.
    pub fn materialize<'a, I>(&self, countries: I) -> Vec<UniversityOption>
    where
        I: IntoIterator<Item = &'a Country>,
    {
        countries
            .into_iter()
            .flat_map(|country| self.universities_for(*country))
            .map(CatalogueEntry::to_option)
            .collect()
    }
}

fn standard_entries() -> Vec<CatalogueEntry> {
    vec![
        CatalogueEntry {
            id: "toronto",
            name: "University of Toronto",
            country: Country::Canada,
            description: "One of Canada's top research universities",
        },
        CatalogueEntry {
            id: "mcgill",
            name: "McGill University",
            country: Country::Canada,
            description: "Renowned for academic excellence",
        },
        CatalogueEntry {
            id: "ubc",
            name: "University of British Columbia",
            country: Country::Canada,
            description: "Leading global university",
        },
        CatalogueEntry {
            id: "sydney",
            name: "University of Sydney",
            country: Country::Australia,
            description: "Australia's first university",
        },
        CatalogueEntry {
            id: "unsw",
            name: "UNSW Sydney",
            country: Country::Australia,
            description: "Top-ranked research university",
        },
        CatalogueEntry {
            id: "melbourne",
            name: "University of Melbourne",
            country: Country::Australia,
            description: "World-class education hub",
        },
        CatalogueEntry {
            id: "lmu",
            name: "LMU Munich",
            country: Country::Germany,
            description: "Excellence in research and teaching",
        },
        CatalogueEntry {
            id: "tu-berlin",
            name: "TU Berlin",
            country: Country::Germany,
            description: "Leading technical university",
        },
        CatalogueEntry {
            id: "mit",
            name: "MIT",
            country: Country::Usa,
            description: "Massachusetts Institute of Technology",
        },
        CatalogueEntry {
            id: "harvard",
            name: "Harvard University",
            country: Country::Usa,
            description: "Ivy League excellence",
        },
        CatalogueEntry {
            id: "stanford",
            name: "Stanford University",
            country: Country::Usa,
            description: "Innovation and entrepreneurship",
        },
        CatalogueEntry {
            id: "oxford",
            name: "University of Oxford",
            country: Country::Uk,
            description: "World's oldest English-speaking university",
        },
        CatalogueEntry {
            id: "cambridge",
            name: "University of Cambridge",
            country: Country::Uk,
            description: "Academic excellence since 1209",
        },
        CatalogueEntry {
            id: "imperial",
            name: "Imperial College London",
            country: Country::Uk,
            description: "Science, engineering, and medicine",
        },
    ]
}
