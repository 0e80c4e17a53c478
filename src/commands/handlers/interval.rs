//! Interval command handlers
//!
//! Handles: setinterval, getinterval
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;

use crate::commands::context::{CommandContext, PERSIST_FAILURE};
use crate::commands::handler::{Invocation, PrefixCommandHandler};
use crate::features::state::{validate_interval, IntervalError, IntervalMode};
use crate::transport::InboundMessage;

pub const USAGE: &str = "USO: !setinterval <normal|apocalypse> <min> <max>";

pub struct IntervalHandler;

#[async_trait]
impl PrefixCommandHandler for IntervalHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["setinterval", "getinterval"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        match invocation.name.as_str() {
            "setinterval" => self.handle_set(&ctx, msg, invocation).await,
            "getinterval" => self.handle_get(&ctx, msg).await,
            _ => Ok(()),
        }
    }
}

/// User-facing text for a rejected interval
fn rejection_notice(err: &IntervalError) -> String {
    match err {
        IntervalError::NonPositiveMin => {
            "INTERVALO INVÁLIDO: o mínimo deve ser maior que zero.".to_string()
        }
        IntervalError::MaxBelowMin { .. } => {
            "INTERVALO INVÁLIDO: o máximo deve ser maior ou igual ao mínimo.".to_string()
        }
        IntervalError::UnknownMode(mode) => {
            format!("MODO DESCONHECIDO: {mode}. Use normal ou apocalypse.")
        }
    }
}

/// Parse `<mode> <min> <max>`; negative bounds are mapped onto the validation errors
fn parse_args(invocation: &Invocation) -> std::result::Result<(IntervalMode, u64, u64), String> {
    let (Some(mode), Some(min), Some(max)) =
        (invocation.arg(0), invocation.arg(1), invocation.arg(2))
    else {
        return Err(USAGE.to_string());
    };
    let mode: IntervalMode = mode.parse().map_err(|e| rejection_notice(&e))?;
    let (Ok(min), Ok(max)) = (min.parse::<i64>(), max.parse::<i64>()) else {
        return Err(USAGE.to_string());
    };
    let min = u64::try_from(min).unwrap_or(0);
    let max = u64::try_from(max).unwrap_or(0);
    validate_interval(min, max).map_err(|e| rejection_notice(&e))?;
    Ok((mode, min, max))
}

impl IntervalHandler {
    async fn handle_set(
        &self,
        ctx: &CommandContext,
        msg: &InboundMessage,
        invocation: &Invocation,
    ) -> Result<()> {
        let (mode, min, max) = match parse_args(invocation) {
            Ok(parsed) => parsed,
            Err(notice) => return ctx.reply(msg.channel_id, &notice).await,
        };

        match ctx.state.set_interval(mode, min, max).await {
            Ok(_) => {
                info!(
                    "[{}] {} interval set to {min}-{max}s by {}",
                    invocation.request_id,
                    mode.label(),
                    msg.author.name
                );
                ctx.reply(
                    msg.channel_id,
                    &format!("INTERVALO {} DEFINIDO: {min}-{max}s", mode.label()),
                )
                .await
            }
            Err(e) => match e.downcast_ref::<IntervalError>() {
                Some(err) => ctx.reply(msg.channel_id, &rejection_notice(err)).await,
                None => ctx.reply(msg.channel_id, PERSIST_FAILURE).await,
            },
        }
    }

    async fn handle_get(&self, ctx: &CommandContext, msg: &InboundMessage) -> Result<()> {
        let intervals = ctx.state.snapshot().await.intervals;
        let report = format!(
            "NORMAL: {}-{}s | APOCALYPSE: {}-{}s",
            intervals.min_normal, intervals.max_normal, intervals.min_apoc, intervals.max_apoc
        );
        ctx.reply(msg.channel_id, &report).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::handlers::testing::{harness, Harness};
    use crate::features::state::StateStore;
    use crate::transport::mock::{inbound, MockTransport};

    async fn run(h: &Harness, line: &str) {
        let msg = inbound(line);
        let inv = Invocation::parse("!", line).unwrap();
        IntervalHandler.handle(h.ctx.clone(), &msg, &inv).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_interval_updates_and_persists() {
        let h = harness(MockTransport::new(), &[]);

        run(&h, "!setinterval apocalypse 30 90").await;

        assert_eq!(h.contents().await, ["INTERVALO APOCALYPSE DEFINIDO: 30-90s"]);
        let reloaded = StateStore::load(&h.tmp.path().join("state.json"));
        assert_eq!(reloaded.intervals.pair(IntervalMode::Apocalypse), (30, 90));
    }

    #[tokio::test]
    async fn test_max_below_min_is_rejected_without_change() {
        let h = harness(MockTransport::new(), &[]);
        let before = h.ctx.state.snapshot().await.intervals;

        run(&h, "!setinterval normal 100 50").await;

        assert_eq!(h.ctx.state.snapshot().await.intervals, before);
        assert_eq!(
            h.contents().await,
            ["INTERVALO INVÁLIDO: o máximo deve ser maior ou igual ao mínimo."]
        );
    }

    #[tokio::test]
    async fn test_zero_and_negative_min_rejected() {
        let h = harness(MockTransport::new(), &[]);

        run(&h, "!setinterval normal 0 50").await;
        run(&h, "!setinterval normal -5 50").await;

        let notice = "INTERVALO INVÁLIDO: o mínimo deve ser maior que zero.";
        assert_eq!(h.contents().await, [notice, notice]);
    }

    #[tokio::test]
    async fn test_unknown_mode_and_usage() {
        let h = harness(MockTransport::new(), &[]);

        run(&h, "!setinterval turbo 1 2").await;
        run(&h, "!setinterval normal dez 20").await;
        run(&h, "!setinterval").await;

        assert_eq!(
            h.contents().await,
            [
                "MODO DESCONHECIDO: turbo. Use normal ou apocalypse.",
                USAGE,
                USAGE
            ]
        );
    }

    #[tokio::test]
    async fn test_get_interval_reports_both_pairs() {
        let h = harness(MockTransport::new(), &[]);

        run(&h, "!getinterval").await;

        assert_eq!(
            h.contents().await,
            ["NORMAL: 600-7200s | APOCALYPSE: 300-3600s"]
        );
    }
}
