use super::StepRejection;
use crate::wizard::domain::{Country, UniversityId, UniversityOption};
use crate::wizard::form::UniversityList;

pub struct UniversitySelectionStep<'a> {
    universities: &'a mut UniversityList,
}

impl<'a> UniversitySelectionStep<'a> {
    pub fn new(universities: &'a mut UniversityList) -> Self {
        Self { universities }
    }

    pub fn toggle_selection(&mut self, id: &UniversityId) -> Result<(), StepRejection> {
        if self.universities.toggle(id) {
            Ok(())
        } else {
            Err(StepRejection::UnknownUniversity(id.clone()))
        }
    }

    pub fn grouped(&self) -> Vec<(Country, Vec<&UniversityOption>)> {
        self.universities.grouped_by_country()
    }

    pub fn proceed(&self) -> Result<(), StepRejection> {
        if self.universities.selected_count() == 0 {
            Err(StepRejection::NoUniversitySelected)
        } else {
            Ok(())
        }
    }
}
