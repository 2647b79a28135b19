use crate::db::{Devotee, NewDevotee, TempleStorage};
use crate::error::TempleError;
use crate::service::accounts::looks_like_email;
use crate::service::label::is_label_safe;
use chrono::NaiveDateTime;
use tracing::info;

impl NewDevotee {
    /// Trim text fields and turn blank optional fields into `None`.
    pub fn normalized(self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        Self {
            devotee_id: self.devotee_id.trim().to_string(),
            name: self.name.trim().to_string(),
            phone: blank_to_none(self.phone),
            email: blank_to_none(self.email),
            address: blank_to_none(self.address),
        }
    }

    pub fn validate(&self) -> Result<(), TempleError> {
        if self.devotee_id.is_empty() {
            return Err(TempleError::Validation("Devotee ID is required".to_string()));
        }
        if self.devotee_id.chars().count() > 20 {
            return Err(TempleError::Validation(
                "Devotee ID must be at most 20 characters".to_string(),
            ));
        }
        if self.name.is_empty() {
            return Err(TempleError::Validation("Name is required".to_string()));
        }
        // both end up inside quoted PRN strings
        if !is_label_safe(&self.devotee_id) || !is_label_safe(&self.name) {
            return Err(TempleError::Validation(
                "Devotee ID and name must not contain quotes or control characters".to_string(),
            ));
        }
        if let Some(email) = &self.email
            && !looks_like_email(email)
        {
            return Err(TempleError::Validation("Invalid email address".to_string()));
        }
        Ok(())
    }
}

/// Register a devotee. The external id must not be in use yet.
pub async fn add_devotee(
    storage: &TempleStorage,
    devotee: NewDevotee,
    now: NaiveDateTime,
) -> Result<Devotee, TempleError> {
    let devotee = devotee.normalized();
    devotee.validate()?;

    if storage
        .find_devotee_by_external_id(&devotee.devotee_id)
        .await?
        .is_some()
    {
        return Err(TempleError::DuplicateKey(format!(
            "Devotee ID {}",
            devotee.devotee_id
        )));
    }

    let created = storage.insert_devotee(&devotee, now).await?;
    info!(devotee_id = %created.devotee_id, "devotee added");
    Ok(created)
}
