use std::collections::HashMap;
use crate::core::CoreError;
use crate::models::{Profile, ProfileId};

/// Read-only, ordered profile collection with id lookup
///
/// Built once at startup and shared between sessions behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct ProfileCatalog {
    profiles: Vec<Profile>,
    index: HashMap<ProfileId, usize>,
}

impl ProfileCatalog {
    /// Build a catalog, keeping dataset order; ids must be unique
    pub fn new(profiles: Vec<Profile>) -> Result<Self, CoreError> {
        let mut index = HashMap::with_capacity(profiles.len());
        for (position, profile) in profiles.iter().enumerate() {
            if index.insert(profile.id, position).is_some() {
                return Err(CoreError::DuplicateProfileId(profile.id));
            }
        }

        Ok(Self { profiles, index })
    }

    pub fn get(&self, id: ProfileId) -> Option<&Profile> {
        self.index.get(&id).map(|&position| &self.profiles[position])
    }

    pub fn contains(&self, id: ProfileId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
