use super::StepRejection;
use crate::wizard::catalogue::UniversityCatalogue;
use crate::wizard::domain::{Country, RequirementKind};
use crate::wizard::form::{CountrySelection, RequirementSet, UniversityList};

pub struct CountrySelectionStep<'a> {
    countries: &'a mut CountrySelection,
    requirements: &'a mut RequirementSet,
    universities: &'a mut UniversityList,
    catalogue: &'a UniversityCatalogue,
}

impl<'a> CountrySelectionStep<'a> {
    pub fn new(
        countries: &'a mut CountrySelection,
        requirements: &'a mut RequirementSet,
        universities: &'a mut UniversityList,
        catalogue: &'a UniversityCatalogue,
    ) -> Self {
        Self {
            countries,
            requirements,
            universities,
            catalogue,
        }
    }

    pub fn toggle_country(&mut self, country: Country) {
        self.countries.toggle(country);
    }

    pub fn toggle_requirement(&mut self, requirement: RequirementKind) {
        self.requirements.toggle(requirement);
    }

    /// Regenerates the university list from the catalogue for the chosen countries. Any
    /// earlier university picks are discarded, even for countries that stayed selected.
    pub fn proceed(&mut self) -> Result<(), StepRejection> {
        if self.countries.is_empty() {
            return Err(StepRejection::NoCountrySelected);
        }

        self.universities.rebuild(self.catalogue, self.countries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::domain::UniversityId;

    #[test]
    fn proceed_requires_a_country() {
        let mut countries = CountrySelection::default();
        let mut requirements = RequirementSet::standard();
        let mut universities = UniversityList::default();
        let mut step = CountrySelectionStep::new(
            &mut countries,
            &mut requirements,
            &mut universities,
            UniversityCatalogue::standard(),
        );

        assert_eq!(step.proceed(), Err(StepRejection::NoCountrySelected));
        assert!(universities.is_empty());
    }

    #[test]
    fn proceed_discards_previous_picks() {
        let mut countries = CountrySelection::default();
        let mut requirements = RequirementSet::standard();
        let mut universities = UniversityList::default();

        {
            let mut step = CountrySelectionStep::new(
                &mut countries,
                &mut requirements,
                &mut universities,
                UniversityCatalogue::standard(),
            );
            step.toggle_country(Country::Canada);
            step.proceed().expect("canada selected");
        }
        assert!(universities.toggle(&UniversityId("mcgill".to_string())));
        assert_eq!(universities.selected_count(), 1);

        let mut step = CountrySelectionStep::new(
            &mut countries,
            &mut requirements,
            &mut universities,
            UniversityCatalogue::standard(),
        );
        step.toggle_requirement(RequirementKind::WorkVisa);
        step.proceed().expect("still canada");

        assert_eq!(universities.len(), 3);
        assert_eq!(universities.selected_count(), 0);
        assert!(requirements.is_checked(RequirementKind::WorkVisa));
    }
}
