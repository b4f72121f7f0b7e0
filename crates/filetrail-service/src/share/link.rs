//! Share link service: create, resolve-and-consume, revoke and list links.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use filetrail_core::error::{AppError, ErrorKind};
use filetrail_core::result::AppResult;
use filetrail_core::traits::{Clock, TokenGenerator};
use filetrail_core::types::{FileId, ShareLinkId};
use filetrail_database::store::{FileStore, ShareLinkStore};
use filetrail_entity::activity::ActivityAction;
use filetrail_entity::file::File;
use filetrail_entity::share::{LinkState, NewShareLink, ShareLink};

use super::password::LinkPasswordHasher;
use crate::activity::ActivityService;
use crate::context::RequestContext;
use crate::file::require_file;

/// Fresh tokens tried when a generated token is already taken.
const TOKEN_ATTEMPTS: u32 = 3;

/// Shared message for unknown, revoked, expired and exhausted links.
const UNUSABLE_LINK: &str = "Share link not found or no longer usable";

/// Options for a new share link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    /// View quota (0 = unlimited).
    pub max_views: i32,
    /// When the link stops working (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Optional password; empty means none.
    pub password: Option<String>,
}

/// A successful link access.
#[derive(Debug, Clone)]
pub struct LinkAccess {
    /// The shared file.
    pub file: File,
    /// The link after this access was counted.
    pub link: ShareLink,
}

/// Issues and validates share links.
#[derive(Clone)]
pub struct ShareLinkService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Link store.
    links: Arc<dyn ShareLinkStore>,
    /// Activity log.
    activity: Arc<ActivityService>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Token source.
    tokens: Arc<dyn TokenGenerator>,
    /// Password hasher.
    hasher: LinkPasswordHasher,
}

impl ShareLinkService {
    /// Creates a new share link service.
    pub fn new(
        files: Arc<dyn FileStore>,
        links: Arc<dyn ShareLinkStore>,
        activity: Arc<ActivityService>,
        clock: Arc<dyn Clock>,
        tokens: Arc<dyn TokenGenerator>,
    ) -> Self {
        Self {
            files,
            links,
            activity,
            clock,
            tokens,
            hasher: LinkPasswordHasher::new(),
        }
    }

    /// Issue a new link for a file.
    pub async fn create_link(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        req: CreateLinkRequest,
    ) -> AppResult<ShareLink> {
        if req.max_views < 0 {
            return Err(AppError::validation("max_views must not be negative"));
        }
        let now = self.clock.now();
        if req.expires_at.is_some_and(|exp| exp <= now) {
            return Err(AppError::validation("Expiry must be in the future"));
        }

        require_file(self.files.as_ref(), file_id).await?;

        let password_hash = match req.password.as_deref().filter(|p| !p.is_empty()) {
            Some(password) => Some(self.hasher.hash(password)?),
            None => None,
        };

        let mut attempt = 1;
        let link = loop {
            let new_link = NewShareLink {
                file_id,
                token: self.tokens.generate(),
                created_by: ctx.user_id,
                expires_at: req.expires_at,
                max_views: req.max_views,
                password_hash: password_hash.clone(),
            };
            match self.links.insert_link(&new_link, now).await {
                Ok(link) => break link,
                Err(e) if e.kind == ErrorKind::Conflict && attempt < TOKEN_ATTEMPTS => {
                    warn!(file_id = %file_id, attempt, "Share token collision, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            file_id = %file_id,
            link_id = %link.id,
            max_views = link.max_views,
            protected = link.requires_password(),
            "Share link created"
        );

        self.activity
            .log(
                file_id,
                Some(ctx.user_id),
                ActivityAction::LinkCreated,
                link.id.to_string(),
            )
            .await;

        Ok(link)
    }

    /// Validate a token and count one view.
    ///
    /// Fails with `NotFound` when the link is unknown, revoked, expired,
    /// exhausted, or points at a missing or trashed file, and with
    /// `Forbidden` when the password does not match.
    pub async fn resolve_and_consume(
        &self,
        token: &str,
        password: Option<&str>,
    ) -> AppResult<LinkAccess> {
        let now = self.clock.now();

        let link = self
            .links
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found(UNUSABLE_LINK))?;

        let state = link.state_at(now);
        if state != LinkState::Usable {
            debug!(link_id = %link.id, state = %state, "Rejected share link access");
            return Err(AppError::not_found(UNUSABLE_LINK));
        }

        if let Some(hash) = &link.password_hash {
            let matches = match password {
                Some(password) => self.hasher.verify(password, hash)?,
                None => false,
            };
            if !matches {
                warn!(link_id = %link.id, "Share link password mismatch");
                return Err(AppError::forbidden("Invalid share password"));
            }
        }

        let file = self
            .files
            .find_file(link.file_id)
            .await?
            .filter(|f| !f.is_trashed())
            .ok_or_else(|| AppError::not_found(UNUSABLE_LINK))?;

        // Check and increment happen in one conditional write; losing a
        // race for the last view lands here.
        let link = self
            .links
            .consume(link.id, now)
            .await?
            .ok_or_else(|| AppError::not_found(UNUSABLE_LINK))?;

        info!(
            link_id = %link.id,
            file_id = %file.id,
            views = link.views,
            "Share link accessed"
        );

        self.activity
            .log(
                file.id,
                None,
                ActivityAction::LinkAccessed,
                format!("view {}", link.views),
            )
            .await;

        Ok(LinkAccess { file, link })
    }

    /// Deactivate a link. Revoking an inactive link succeeds.
    pub async fn revoke_link(&self, ctx: &RequestContext, link_id: ShareLinkId) -> AppResult<()> {
        let link = self
            .links
            .find_link(link_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Share link {link_id} not found")))?;

        if !self.links.deactivate(link_id).await? {
            return Err(AppError::not_found(format!("Share link {link_id} not found")));
        }

        if link.is_active {
            info!(user_id = %ctx.user_id, link_id = %link_id, "Share link revoked");
            self.activity
                .log(
                    link.file_id,
                    Some(ctx.user_id),
                    ActivityAction::LinkRevoked,
                    link_id.to_string(),
                )
                .await;
        }

        Ok(())
    }

    /// Every link of a file, active or not, newest first.
    pub async fn list_links(&self, file_id: FileId) -> AppResult<Vec<ShareLink>> {
        debug!(file_id = %file_id, "Listing share links");
        self.links.list_for_file(file_id).await
    }
}
