use super::StepRejection;
use crate::wizard::domain::UserProfile;

pub struct RegistrationStep<'a> {
    profile: &'a mut UserProfile,
}

impl<'a> RegistrationStep<'a> {
    pub fn new(profile: &'a mut UserProfile) -> Self {
        Self { profile }
    }

    /// Stores the submitted profile and passes the gate iff full name and email are set.
    pub fn submit(&mut self, profile: UserProfile) -> Result<(), StepRejection> {
        *self.profile = profile;
        self.proceed()
    }

    pub fn proceed(&self) -> Result<(), StepRejection> {
        if self.profile.is_complete() {
            Ok(())
        } else {
            Err(StepRejection::IncompleteProfile)
        }
    }
}
