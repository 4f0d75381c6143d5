use super::catalogue::UniversityCatalogue;
use super::domain::{
    CandidateFile, Country, DocumentKind, DocumentSlot, RequirementFlag, RequirementKind,
    UniversityId, UniversityOption, UserProfile,
};
use serde::{Deserialize, Serialize};

/// Every mutable field the wizard collects, split into the slices handed to each step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationForm {
    pub profile: UserProfile,
    pub documents: DocumentSet,
    pub countries: CountrySelection,
    pub requirements: RequirementSet,
    pub universities: UniversityList,
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self {
            profile: UserProfile::default(),
            documents: DocumentSet::standard(),
            countries: CountrySelection::default(),
            requirements: RequirementSet::standard(),
            universities: UniversityList::default(),
        }
    }
}

/// Fixed set of upload slots, one per document kind, created with the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentSet(Vec<DocumentSlot>);

impl DocumentSet {
    pub fn standard() -> Self {
        Self(
            DocumentKind::ordered()
                .into_iter()
                .map(DocumentSlot::empty)
                .collect(),
        )
    }

    pub fn slots(&self) -> &[DocumentSlot] {
        &self.0
    }

    pub fn slot(&self, kind: DocumentKind) -> Option<&DocumentSlot> {
        self.0.iter().find(|slot| slot.kind == kind)
    }

    pub(crate) fn set(&mut self, kind: DocumentKind, file: Option<CandidateFile>) {
        match self.0.iter_mut().find(|slot| slot.kind == kind) {
            Some(slot) => slot.file = file,
            None => self.0.push(DocumentSlot { kind, file }),
        }
    }

    pub fn missing_required(&self) -> Vec<DocumentKind> {
        DocumentKind::ordered()
            .into_iter()
            .filter(|kind| kind.is_required())
            .filter(|kind| !self.slot(*kind).is_some_and(DocumentSlot::is_filled))
            .collect()
    }
}

/// Chosen destination countries, kept in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountrySelection(Vec<Country>);

impl CountrySelection {
    pub fn toggle(&mut self, country: Country) {
        if let Some(index) = self.0.iter().position(|picked| *picked == country) {
            self.0.remove(index);
        } else {
            self.0.push(country);
        }
    }

    pub fn contains(&self, country: Country) -> bool {
        self.0.contains(&country)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Country] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequirementSet(Vec<RequirementFlag>);

impl RequirementSet {
    pub fn standard() -> Self {
        Self(
            RequirementKind::ordered()
                .into_iter()
                .map(|kind| RequirementFlag {
                    kind,
                    checked: false,
                })
                .collect(),
        )
    }

    pub fn toggle(&mut self, kind: RequirementKind) {
        for flag in self.0.iter_mut().filter(|flag| flag.kind == kind) {
            flag.checked = !flag.checked;
        }
    }

    pub fn flags(&self) -> &[RequirementFlag] {
        &self.0
    }

    pub fn is_checked(&self, kind: RequirementKind) -> bool {
        self.0.iter().any(|flag| flag.kind == kind && flag.checked)
    }

    pub fn checked(&self) -> Vec<RequirementKind> {
        self.0
            .iter()
            .filter(|flag| flag.checked)
            .map(|flag| flag.kind)
            .collect()
    }
}

/// Working list of universities offered on the selection step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniversityList(Vec<UniversityOption>);

impl UniversityList {
    /// Replaces the list wholesale; prior selections are not carried over.
    pub(crate) fn rebuild(&mut self, catalogue: &UniversityCatalogue, countries: &CountrySelection) {
        self.0 = catalogue.materialize(countries.as_slice());
    }

    /// Flips the selection flag of one entry, reporting whether the id was present.
    pub(crate) fn toggle(&mut self, id: &UniversityId) -> bool {
        match self.0.iter_mut().find(|option| &option.id == id) {
            Some(option) => {
                option.selected = !option.selected;
                true
            }
            None => false,
        }
    }

    pub fn options(&self) -> &[UniversityOption] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn selected(&self) -> impl Iterator<Item = &UniversityOption> {
        self.0.iter().filter(|option| option.selected)
    }

    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Groups entries by country, countries ordered by first appearance in the list.
    pub fn grouped_by_country(&self) -> Vec<(Country, Vec<&UniversityOption>)> {
        let mut groups: Vec<(Country, Vec<&UniversityOption>)> = Vec::new();
        for option in &self.0 {
            match groups
                .iter_mut()
                .find(|(country, _)| *country == option.country)
            {
                Some((_, members)) => members.push(option),
                None => groups.push((option.country, vec![option])),
            }
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_set_starts_with_every_slot_empty() {
        let documents = DocumentSet::standard();
        assert_eq!(documents.slots().len(), 5);
        assert_eq!(documents.missing_required(), DocumentKind::ordered().to_vec());
    }

    #[test]
    fn country_toggle_is_symmetric_and_keeps_order() {
        let mut countries = CountrySelection::default();
        countries.toggle(Country::Usa);
        countries.toggle(Country::Canada);
        countries.toggle(Country::Germany);
        countries.toggle(Country::Canada);

        assert_eq!(countries.as_slice(), &[Country::Usa, Country::Germany]);

        countries.toggle(Country::Canada);
        assert_eq!(
            countries.as_slice(),
            &[Country::Usa, Country::Germany, Country::Canada]
        );
    }

    #[test]
    fn requirement_toggle_only_touches_one_flag() {
        let mut requirements = RequirementSet::standard();
        requirements.toggle(RequirementKind::Scholarship);
        requirements.toggle(RequirementKind::Pr);
        requirements.toggle(RequirementKind::Pr);

        assert_eq!(requirements.checked(), vec![RequirementKind::Scholarship]);
    }

    #[test]
    fn grouping_follows_list_order() {
        let mut countries = CountrySelection::default();
        countries.toggle(Country::Germany);
        countries.toggle(Country::Canada);

        let mut list = UniversityList::default();
        list.rebuild(UniversityCatalogue::standard(), &countries);

        let groups = list.grouped_by_country();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Country::Germany);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, Country::Canada);
        assert_eq!(groups[1].1.len(), 3);
    }
}
