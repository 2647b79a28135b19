use crate::db::{TempleStorage, Visit};
use crate::error::TempleError;
use crate::service::label::{LabelData, render_prn, validate_label_data};
use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Display fields of the most recent visit, including the printable label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrintData {
    pub devotee_id: String,
    pub devotee_name: String,
    pub item: String,
    pub date: String,
    pub prn_template: String,
}

#[derive(Debug, Clone)]
pub struct RecordedVisit {
    pub visit: Visit,
    pub print: PrintData,
}

/// Records visits and assigns each one a random catalog item.
#[derive(Clone)]
pub struct VisitRecorder {
    storage: TempleStorage,
    rng: Arc<Mutex<StdRng>>,
}

impl VisitRecorder {
    pub fn new(storage: TempleStorage, rng: StdRng) -> Self {
        Self {
            storage,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn from_os_rng(storage: TempleStorage) -> Self {
        Self::new(storage, StdRng::from_os_rng())
    }

    /// Look up the devotee, draw an item uniformly from the whole catalog,
    /// persist the visit at `now` and build the label.
    ///
    /// Nothing is written when the devotee is unknown, the catalog is empty,
    /// or the label would be missing a required field.
    pub async fn record(
        &self,
        devotee_id: &str,
        now: NaiveDateTime,
    ) -> Result<RecordedVisit, TempleError> {
        let devotee = self
            .storage
            .find_devotee_by_external_id(devotee_id)
            .await?
            .ok_or_else(|| TempleError::NotFound(format!("Devotee ID {devotee_id}")))?;

        let items = self.storage.list_items().await?;
        if items.is_empty() {
            return Err(TempleError::CatalogEmpty);
        }
        let index = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| TempleError::Internal("item rng lock poisoned".to_string()))?;
            rng.random_range(0..items.len())
        };
        let item = &items[index];

        // label must validate before anything is written
        let label = LabelData {
            devotee_id: devotee.devotee_id.clone(),
            devotee_name: devotee.name.clone(),
            item: item.name.clone(),
            date: now.format("%Y-%m-%d").to_string(),
        };
        validate_label_data(&label)?;

        let visit = self.storage.insert_visit(devotee.id, item.id, now).await?;
        let prn_template = render_prn(&label);

        info!(
            devotee_id = %devotee.devotee_id,
            item = %item.name,
            visit_id = visit.id,
            "visit recorded"
        );

        Ok(RecordedVisit {
            visit,
            print: PrintData {
                devotee_id: label.devotee_id,
                devotee_name: label.devotee_name,
                item: label.item,
                date: label.date,
                prn_template,
            },
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DevoteeSummary {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VisitEntry {
    pub date: String,
    pub item: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DevoteeHistory {
    pub devotee: DevoteeSummary,
    pub visits: Vec<VisitEntry>,
}

/// Every visit of one devotee, oldest first.
pub async fn devotee_history(
    storage: &TempleStorage,
    devotee_id: &str,
) -> Result<DevoteeHistory, TempleError> {
    let devotee = storage
        .find_devotee_by_external_id(devotee_id)
        .await?
        .ok_or_else(|| TempleError::NotFound("Devotee".to_string()))?;

    let visits = storage
        .visits_for_devotee(devotee.id)
        .await?
        .into_iter()
        .map(|v| VisitEntry {
            date: v.visit_date.format("%Y-%m-%d").to_string(),
            item: v.item,
        })
        .collect();

    Ok(DevoteeHistory {
        devotee: DevoteeSummary {
            id: devotee.devotee_id,
            name: devotee.name,
        },
        visits,
    })
}
