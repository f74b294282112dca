use std::sync::Arc;

use culler_logging::{culler_debug, culler_info, culler_warn};
use serde::Serialize;
use serde_json::Value;

use crate::{CullError, Credential, PhotosApi, ViewedSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApprovalReceipt {
    pub success: bool,
    pub response: Value,
}

/// Records review decisions.
///
/// Both decisions mark the item viewed first. A failed album add after
/// approval is reported but the item stays viewed.
pub struct ApprovalSink {
    api: Arc<dyn PhotosApi>,
    viewed: Arc<ViewedSet>,
    target_album_id: Option<String>,
}

impl ApprovalSink {
    pub fn new(
        api: Arc<dyn PhotosApi>,
        viewed: Arc<ViewedSet>,
        target_album_id: Option<String>,
    ) -> Self {
        Self {
            api,
            viewed,
            target_album_id: target_album_id.filter(|id| !id.trim().is_empty()),
        }
    }

    pub async fn approve(
        &self,
        credential: &Credential,
        item_id: &str,
    ) -> Result<ApprovalReceipt, CullError> {
        let Some(album_id) = self.target_album_id.as_deref() else {
            return Err(CullError::Configuration(
                "no target album id configured".to_string(),
            ));
        };

        self.viewed.record(item_id)?;

        let ids = [item_id.to_string()];
        culler_debug!("Adding {} to album {}", item_id, album_id);
        match self.api.batch_add(credential, album_id, &ids).await {
            Ok(response) => {
                culler_info!("Approved {}", item_id);
                Ok(ApprovalReceipt {
                    success: true,
                    response,
                })
            }
            Err(err) => {
                culler_warn!("Approved {} but the album add failed: {}", item_id, err);
                Err(CullError::remote_add(err))
            }
        }
    }

    pub fn skip(&self, item_id: &str) -> Result<(), CullError> {
        if self.viewed.record(item_id)? {
            culler_debug!("Skipped {}", item_id);
        }
        Ok(())
    }
}
