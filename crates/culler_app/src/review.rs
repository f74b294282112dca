use std::io::{self, BufRead, Write};

use culler_core::ReviewCard;
use culler_engine::{Credential, CullError, Culler, PickResult};
use culler_logging::{culler_info, culler_warn};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failure of a single command. Only `Cull` carries a user-facing payload.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Cull(#[from] CullError),

    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Turns "no token" into the same error as a rejected token.
pub fn require(credential: Option<&Credential>) -> Result<&Credential, CullError> {
    credential.ok_or(CullError::Unauthenticated)
}

pub async fn pick(
    culler: &Culler,
    credential: Option<&Credential>,
) -> Result<Value, CommandError> {
    let result = culler.pick_random_unseen(require(credential)?).await?;
    Ok(to_json(&result)?)
}

pub async fn approve(
    culler: &Culler,
    credential: Option<&Credential>,
    id: &str,
) -> Result<Value, CommandError> {
    let receipt = culler.approve(require(credential)?, id).await?;
    Ok(to_json(&receipt)?)
}

pub fn skip(culler: &Culler, id: &str) -> Result<Value, CommandError> {
    let receipt = culler.skip(id)?;
    Ok(to_json(&receipt)?)
}

fn to_json(value: &impl Serialize) -> serde_json::Result<Value> {
    serde_json::to_value(value)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReviewStats {
    pub approved: usize,
    pub skipped: usize,
    pub failed: usize,
}

enum Decision {
    Approve,
    Skip,
    Quit,
}

/// Interactive loop: show one card, read `a`/`s`/`q`, repeat until the
/// library runs dry, the user quits or input ends.
///
/// Authentication and ledger failures end the loop after printing their user
/// message; a failed album add is reported and the loop moves on, since the
/// item is already marked viewed.
pub async fn review<R: BufRead, W: Write>(
    culler: &Culler,
    credential: Option<&Credential>,
    mut input: R,
    mut out: W,
) -> Result<ReviewStats, CommandError> {
    let mut stats = ReviewStats::default();
    match review_loop(culler, credential, &mut input, &mut out, &mut stats).await {
        Ok(()) => {}
        Err(CommandError::Cull(err)) => {
            writeln!(out, "{}", err.user_message())?;
            return Err(err.into());
        }
        Err(err) => return Err(err),
    }

    culler_info!(
        "Review finished: {} approved, {} skipped, {} failed",
        stats.approved,
        stats.skipped,
        stats.failed
    );
    Ok(stats)
}

async fn review_loop<R: BufRead, W: Write>(
    culler: &Culler,
    credential: Option<&Credential>,
    input: &mut R,
    out: &mut W,
    stats: &mut ReviewStats,
) -> Result<(), CommandError> {
    let credential = require(credential)?;

    loop {
        let card = match culler.pick_random_unseen(credential).await? {
            PickResult::Picked(card) => card,
            PickResult::NoneAvailable { message, .. } => {
                writeln!(out, "{message}")?;
                return Ok(());
            }
        };
        show(out, &card)?;

        match prompt(input, out)? {
            Decision::Approve => match culler.approve(credential, &card.id).await {
                Ok(_) => {
                    stats.approved += 1;
                    writeln!(out, "Approved.")?;
                }
                Err(err @ CullError::RemoteAddFailure(_)) => {
                    stats.failed += 1;
                    culler_warn!("Approve {} failed: {}", card.id, err);
                    writeln!(out, "{}", err.user_message())?;
                }
                Err(err) => return Err(err.into()),
            },
            Decision::Skip => {
                culler.skip(&card.id)?;
                stats.skipped += 1;
                writeln!(out, "Skipped.")?;
            }
            Decision::Quit => return Ok(()),
        }
    }
}

fn show(out: &mut impl Write, card: &ReviewCard) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", card.filename)?;
    writeln!(out, "  camera: {} {}", card.camera.make, card.camera.model)?;
    if let Some(timestamp) = &card.timestamp {
        writeln!(out, "  taken:  {timestamp}")?;
    }
    writeln!(out, "  url:    {}", card.url)
}

fn prompt(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<Decision> {
    loop {
        write!(out, "[a]pprove / [s]kip / [q]uit: ")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Decision::Quit);
        }
        match line.trim().to_ascii_lowercase().as_str() {
            "a" | "approve" => return Ok(Decision::Approve),
            "s" | "skip" => return Ok(Decision::Skip),
            "q" | "quit" => return Ok(Decision::Quit),
            _ => writeln!(out, "Please answer a, s or q.")?,
        }
    }
}
