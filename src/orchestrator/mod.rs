//! Batch conversion orchestration

use chrono::Utc;
use tracing::{error, info};

use crate::classifier;
use crate::command::conversion_command;
use crate::error::{Error, Result};
use crate::models::{
    BatchOutcome, CommandParams, ConversionList, ConversionTarget, EntryPatch, ExecutionReport,
    ObjectType, SourceMember,
};
use crate::progress::{CancellationToken, NullProgress, Progress};
use crate::resolver::{self, ObjectTypeResolver};
use crate::session::Session;
use crate::utils::is_supported_source_type;

/// What a batch is about to do, handed to the confirmation hook before any
/// remote work starts.
#[derive(Debug, Clone)]
pub struct BatchPreview {
    pub names: Vec<String>,
}

impl BatchPreview {
    /// Member names as shown in the confirmation prompt: the first ten,
    /// then a count of the rest.
    pub fn summary(&self) -> String {
        let mut lines: Vec<String> = self
            .names
            .iter()
            .take(10)
            .map(|name| format!("- {name}"))
            .collect();
        if self.names.len() > 10 {
            lines.push(format!("- {} more...", self.names.len() - 10));
        }
        lines.join("\n")
    }
}

/// Hooks and switches for one orchestrator run.
pub struct BatchOptions<'a> {
    /// Asked once per batch, before object types are resolved. `None`
    /// converts without asking.
    pub confirm: Option<&'a dyn Fn(&BatchPreview) -> bool>,
    pub progress: &'a dyn Progress,
    pub cancel: CancellationToken,
}

impl Default for BatchOptions<'_> {
    fn default() -> Self {
        BatchOptions {
            confirm: None,
            progress: &NullProgress,
            cancel: CancellationToken::new(),
        }
    }
}

/// How an orchestrator run ended.
#[derive(Debug)]
pub enum BatchRun {
    /// The target's source file had no convertible members.
    NoMembers,
    /// The confirmation hook said no.
    Declined,
    /// Cancelled before the first conversion was attempted.
    Cancelled,
    /// At least one conversion was attempted; partial results included.
    Completed(BatchOutcome),
}

fn single_member(target: &ConversionTarget) -> Result<SourceMember> {
    let extension = target.extension.clone().unwrap_or_default();
    if !is_supported_source_type(&extension) {
        return Err(Error::UnsupportedSourceType(extension));
    }
    Ok(SourceMember {
        library: target.library.clone(),
        file: target.file.clone(),
        name: target
            .member
            .clone()
            .ok_or_else(|| Error::InvalidMemberPath(target.display_name().to_string()))?,
        extension,
        text: None,
    })
}

/// Resolve one object type per member, honoring an explicit override.
/// Returns `None` when cancellation was observed mid-pass.
async fn resolve_types(
    session: &Session,
    members: &[SourceMember],
    override_type: Option<ObjectType>,
    options: &BatchOptions<'_>,
) -> Result<Option<Vec<ObjectType>>> {
    if let Some(object_type) = override_type {
        return Ok(Some(vec![object_type; members.len()]));
    }
    let library_list = &session.config().connection.library_list;
    let mut resolver = ObjectTypeResolver::new(session.gateway(), library_list);
    let step = 100.0 / members.len() as f64;
    let mut types = Vec::with_capacity(members.len());
    for member in members {
        if options.cancel.is_cancelled() {
            return Ok(None);
        }
        options
            .progress
            .report(step, &format!("Resolving object type for {}", member.name));
        types.push(resolver.resolve(&member.library, &member.name).await?);
    }
    Ok(Some(types))
}

/// Run the conversion loop over resolved members. Transport failures are
/// logged and skipped; the loop keeps going so one flaky call does not
/// sink the batch.
async fn convert_members(
    session: &Session,
    members: Vec<SourceMember>,
    types: Vec<ObjectType>,
    params: &CommandParams,
    options: &BatchOptions<'_>,
) -> BatchOutcome {
    let total = members.len();
    let step = 100.0 / total as f64;
    let mut outcome = BatchOutcome {
        total,
        ..Default::default()
    };

    for (index, (member, object_type)) in members.into_iter().zip(types).enumerate() {
        if options.cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }
        options.progress.report(
            step,
            &format!("{} ({}/{})", member.name, index + 1, total),
        );

        let command = conversion_command(
            session.product_library(),
            &member,
            Some(object_type),
            params,
        );
        let result = match session.gateway().run_command(&command).await {
            Ok(result) => result,
            Err(err) => {
                error!(member = %member.path(), %err, "conversion call failed");
                continue;
            }
        };

        if classifier::is_conversion_ok(&result) {
            outcome.converted += 1;
        }
        let mut target = ConversionTarget::for_file(&member.library, &member.file, None);
        target.member = Some(member.name.clone());
        target.extension = Some(member.extension.clone());
        target.object_type = Some(object_type);
        outcome.reports.push(ExecutionReport { target, result });
    }
    outcome
}

/// Convert a single member or every matching member of a source file.
///
/// The sequence is: collect members, confirm (batch targets only), resolve
/// object types, then convert sequentially with progress and cancellation
/// polled before each member.
pub async fn run_batch(
    session: &mut Session,
    target: &ConversionTarget,
    params: &CommandParams,
    options: &BatchOptions<'_>,
) -> Result<BatchRun> {
    session.ensure_product().await?;

    let members = if target.is_batch() {
        let members = resolver::list_members(session.gateway(), target).await?;
        if members.is_empty() {
            return Ok(BatchRun::NoMembers);
        }
        members
    } else {
        vec![single_member(target)?]
    };

    if target.is_batch() {
        if let Some(confirm) = options.confirm {
            let preview = BatchPreview {
                names: members.iter().map(|m| m.name.clone()).collect(),
            };
            if !confirm(&preview) {
                return Ok(BatchRun::Declined);
            }
        }
    }

    let Some(types) = resolve_types(session, &members, target.object_type, options).await? else {
        return Ok(BatchRun::Cancelled);
    };

    info!(
        library = %target.library,
        file = %target.file,
        members = members.len(),
        "starting conversion batch"
    );
    let outcome = convert_members(session, members, types, params, options).await;
    if outcome.cancelled && outcome.reports.is_empty() {
        return Ok(BatchRun::Cancelled);
    }
    Ok(BatchRun::Completed(outcome))
}

/// Convert every entry of a stored list, updating each entry's status,
/// message and conversion date in the settings store as results come in.
///
/// Every entry must already carry an object type; entries without one
/// reject the whole run before any remote call is made. The list's target
/// library and source file, when set, override the destination parameters.
pub async fn convert_list(
    session: &mut Session,
    list: &ConversionList,
    params: &CommandParams,
    options: &BatchOptions<'_>,
) -> Result<BatchRun> {
    if list.items.is_empty() {
        return Ok(BatchRun::NoMembers);
    }

    let mut types = Vec::with_capacity(list.items.len());
    let mut untyped = Vec::new();
    for item in &list.items {
        match item.object_type {
            Some(object_type) => types.push(object_type),
            None => untyped.push(item.member.as_str()),
        }
    }
    if !untyped.is_empty() {
        return Err(Error::MissingObjectType(untyped.join(", ")));
    }

    session.ensure_product().await?;

    if let Some(confirm) = options.confirm {
        let preview = BatchPreview {
            names: list.items.iter().map(|item| item.member.clone()).collect(),
        };
        if !confirm(&preview) {
            return Ok(BatchRun::Declined);
        }
    }

    let members: Vec<SourceMember> = list
        .items
        .iter()
        .map(|item| SourceMember {
            library: item.library.clone(),
            file: item.source_file.clone(),
            name: item.member.clone(),
            extension: item.source_type.clone(),
            text: None,
        })
        .collect();

    let mut params = params.clone();
    if !list.target_library.is_empty() {
        params.tosrclib = list.target_library.clone();
    }
    if !list.target_source_file.is_empty() {
        params.tosrcfile = list.target_source_file.clone();
    }

    let outcome = convert_members(session, members, types, &params, options).await;

    for report in &outcome.reports {
        let member = report.target.display_name();
        let text = format!("{}\n{}", report.result.stdout, report.result.stderr);
        let patch = EntryPatch {
            source_file: Some(report.target.file.clone()),
            status: Some(classifier::classify(&text)),
            // raw stream, stderr first; the summary line is display-only
            message: Some(report.result.diagnostics().to_string()),
            conversion_date: Some(Utc::now()),
            ..Default::default()
        };
        session.store().update_item(&list.name, member, &patch)?;
    }

    if outcome.cancelled && outcome.reports.is_empty() {
        return Ok(BatchRun::Cancelled);
    }
    Ok(BatchRun::Completed(outcome))
}
