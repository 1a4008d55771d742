// crates/respond-cli/src/session.rs
// ============================================================================
// Module: Respond Command Session
// Description: Chat-command semantics over the respond engine.
// Purpose: Apply admin checks, chance policy, formatting, and collaborators.
// Dependencies: respond-broker, respond-core, time, tracing
// ============================================================================

//! ## Overview
//! A [`Session`] owns the engine for one process and answers each command
//! with chat-ready lines. Mutations and listing are admin-only. Emitting
//! never fails: unexpected engine errors are logged and yield no replies,
//! and a failing executable response is reported in place of its output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use respond_broker::CommandRunner;
use respond_broker::PublishError;
use respond_broker::TextPublisher;
use respond_broker::report_title;
use respond_core::ResponseId;
use respond_core::ResponseStore;
use respond_core::Respond;
use respond_core::RespondError;
use respond_core::TriggerSet;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::error;
use tracing::trace;
use tracing::warn;

use crate::admin::AdminGate;
use crate::admin::PermissionDenied;
use crate::chance::ChancePolicy;
use crate::format::EMPTY_LIST_MESSAGE;
use crate::format::chat_lines;
use crate::format::format_all;
use crate::format::format_edited;
use crate::format::format_removed;
use crate::format::format_response_tree;
use crate::intent::Intent;
use crate::intent::Reply;
use crate::intent::parse;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Command failures surfaced to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The caller is not an administrator.
    #[error(transparent)]
    PermissionDenied(#[from] PermissionDenied),
    /// The engine rejected the command.
    #[error(transparent)]
    Respond(#[from] RespondError),
    /// The report could not be published.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Arguments for creating a response.
#[derive(Debug, Clone)]
pub struct AddRequest {
    /// Trigger texts.
    pub triggers: Vec<String>,
    /// Response text.
    pub response: String,
    /// Requested chance; `None` uses the default.
    pub chance: Option<f64>,
    /// Author identity.
    pub author: String,
    /// Whether the response is a shell command.
    pub executable: bool,
}

/// Arguments for appending triggers to a response.
#[derive(Debug, Clone)]
pub struct AddTriggersRequest {
    /// Target response id.
    pub response_id: i64,
    /// Trigger texts.
    pub triggers: Vec<String>,
    /// Requested chance; `None` uses the default.
    pub chance: Option<f64>,
    /// Author identity.
    pub author: String,
}

/// Arguments for editing a response or trigger.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// `response` or `trigger`.
    pub target: String,
    /// Entity id.
    pub id: i64,
    /// Replacement text.
    pub text: String,
    /// Replacement chance for triggers.
    pub chance: Option<f64>,
    /// Replacement executable flag for responses.
    pub executable: Option<bool>,
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Command session over one engine and its collaborators.
pub struct Session<S> {
    /// Matching engine and mutation orchestrator.
    engine: Respond<S>,
    /// Admin check for privileged commands.
    admin: AdminGate,
    /// Chance defaults and clamping.
    chance: ChancePolicy,
    /// Report publisher.
    publisher: Box<dyn TextPublisher>,
    /// Executable response runner; `None` when execution is disabled.
    runner: Option<Box<dyn CommandRunner>>,
}

impl<S: ResponseStore> Session<S> {
    /// Creates a session.
    #[must_use]
    pub fn new(
        engine: Respond<S>,
        admin: AdminGate,
        chance: ChancePolicy,
        publisher: Box<dyn TextPublisher>,
        runner: Option<Box<dyn CommandRunner>>,
    ) -> Self {
        Self { engine, admin, chance, publisher, runner }
    }

    /// Returns the engine.
    #[must_use]
    pub const fn engine(&self) -> &Respond<S> {
        &self.engine
    }

    /// Resolves a chat message into replies.
    pub async fn emit(&self, message: &str, nick: &str) -> Vec<Reply> {
        let responses = match self.engine.try_emit(message) {
            Ok(responses) => responses,
            Err(err) if err.is_expected() => {
                trace!(kind = err.kind(), "no response emitted");
                return Vec::new();
            }
            Err(err) => {
                error!(kind = err.kind(), error = %err, "emit failed");
                return Vec::new();
            }
        };
        let mut replies = Vec::new();
        for response in responses {
            if !response.executable {
                replies.extend(parse(&response.response, nick));
                continue;
            }
            let Some(runner) = &self.runner else {
                warn!(response_id = response.id.get(), "executable response skipped");
                continue;
            };
            match runner.run(&response.response).await {
                Ok(lines) => {
                    for line in lines {
                        replies.extend(parse(&line, nick));
                    }
                }
                Err(err) => {
                    warn!(
                        response_id = response.id.get(),
                        error = %err,
                        "executable response failed"
                    );
                    replies.push(Reply::new(
                        Intent::Notice,
                        format!("Response {} failed: {err}", response.id),
                    ));
                }
            }
        }
        replies
    }

    /// Creates a response with triggers.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the caller is not an admin or the engine
    /// rejects the request.
    pub fn add(
        &mut self,
        hostmask: Option<&str>,
        request: AddRequest,
    ) -> Result<Vec<String>, SessionError> {
        self.admin.authorize(hostmask)?;
        let chance = self.chance.resolve(request.chance);
        let created = self.engine.add(
            TriggerSet::Many(request.triggers),
            &request.response,
            chance,
            &request.author,
            request.executable,
        )?;
        Ok(chat_lines("Added:", &format_response_tree(&created)))
    }

    /// Appends triggers to an existing response.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the caller is not an admin or the engine
    /// rejects the request.
    pub fn add_triggers(
        &mut self,
        hostmask: Option<&str>,
        request: AddTriggersRequest,
    ) -> Result<Vec<String>, SessionError> {
        self.admin.authorize(hostmask)?;
        let chance = self.chance.resolve(request.chance);
        let updated = self.engine.add_triggers(
            ResponseId::new(request.response_id),
            TriggerSet::Many(request.triggers),
            chance,
            &request.author,
        )?;
        Ok(chat_lines("Added:", &format_response_tree(&updated)))
    }

    /// Edits a response or trigger.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the caller is not an admin or the engine
    /// rejects the request.
    pub fn edit(
        &mut self,
        hostmask: Option<&str>,
        request: &EditRequest,
    ) -> Result<Vec<String>, SessionError> {
        self.admin.authorize(hostmask)?;
        let chance = self.chance.resolve_edit(request.chance);
        let edited = self.engine.edit(
            &request.target,
            request.id,
            &request.text,
            chance,
            request.executable,
        )?;
        Ok(chat_lines("Updated:", &format_edited(&edited)))
    }

    /// Removes a response or trigger.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the caller is not an admin or the engine
    /// rejects the request.
    pub fn remove(
        &mut self,
        hostmask: Option<&str>,
        target: &str,
        id: i64,
    ) -> Result<Vec<String>, SessionError> {
        self.admin.authorize(hostmask)?;
        let removed = self.engine.remove(target, id)?;
        Ok(chat_lines("Removed:", &format_removed(&removed)))
    }

    /// Lists everything, publishing the report unless `local` is set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the caller is not an admin, the store
    /// cannot be read, or publishing fails.
    pub async fn list(
        &self,
        hostmask: Option<&str>,
        local: bool,
    ) -> Result<Vec<String>, SessionError> {
        self.admin.authorize(hostmask)?;
        let responses = self.engine.get_all()?;
        if responses.is_empty() {
            return Ok(vec![EMPTY_LIST_MESSAGE.to_string()]);
        }
        let report = format_all(&responses);
        if local {
            let lines = report.split('\n').filter(|line| !line.is_empty());
            return Ok(lines.map(ToString::to_string).collect());
        }
        let title = report_title(OffsetDateTime::now_utc());
        let url = self.publisher.publish(&title, &report).await.inspect_err(|err| {
            error!(error = %err, "report publish failed");
        })?;
        Ok(vec![url])
    }
}
