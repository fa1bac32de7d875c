//! Subcommand implementations. Each writes its report to `out`.

use std::io::Write;

use selroute_core::{detect as detect_host, Capability, Decision, Router, RouterConfig};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct DetectReport {
    host_capability: Capability,
    capability: Capability,
    kernel: &'static str,
    lanes: usize,
    forced: bool,
}

#[derive(Debug, Serialize)]
struct RouteReport {
    query: f32,
    world: f32,
    /// `None` when the world volume is not a positive finite number.
    selectivity: Option<f32>,
    threshold: f32,
    decision: Decision,
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    query: f32,
    world: f32,
    decision: Decision,
}

#[derive(Debug, Serialize)]
struct EffectiveConfig {
    threshold: f64,
    backend_a_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    forced_capability: Option<Capability>,
}

/// Selectivity as the router sees it, if it is defined for the pair.
fn selectivity(query: f32, world: f32) -> Option<f32> {
    (query.is_finite() && world.is_finite() && world > 0.0).then(|| query.max(0.0) / world)
}

/// Widens through the shortest decimal form, so TOML shows `0.01` rather
/// than the exact binary value of `0.01_f32`.
fn widen(value: f32) -> f64 {
    value.to_string().parse().unwrap_or(f64::from(value))
}

pub fn detect(out: &mut impl Write, config: RouterConfig, json: bool) -> anyhow::Result<()> {
    let router = Router::new(config);
    let report = DetectReport {
        host_capability: detect_host(),
        capability: router.capability(),
        kernel: router.kernel().as_str(),
        lanes: router.capability().lanes(),
        forced: config.forced_capability().is_some(),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "host capability: {}", report.host_capability)?;
        writeln!(
            out,
            "router capability: {}{}",
            report.capability,
            if report.forced { " (forced)" } else { "" }
        )?;
        writeln!(out, "kernel: {} ({} lanes)", report.kernel, report.lanes)?;
    }
    Ok(())
}

pub fn route(
    out: &mut impl Write,
    config: RouterConfig,
    query: f32,
    world: f32,
    json: bool,
) -> anyhow::Result<()> {
    let router = Router::new(config);
    let report = RouteReport {
        query,
        world,
        selectivity: selectivity(query, world),
        threshold: config.threshold(),
        decision: router.route(query, world),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        match report.selectivity {
            Some(s) => writeln!(
                out,
                "{} (selectivity {s} vs threshold {})",
                report.decision, report.threshold
            )?,
            None => writeln!(out, "{} (degenerate input)", report.decision)?,
        }
    }
    Ok(())
}

pub fn batch(
    out: &mut impl Write,
    config: RouterConfig,
    pairs: &[(f32, f32)],
    json: bool,
) -> anyhow::Result<()> {
    let router = Router::new(config);
    let (queries, worlds): (Vec<f32>, Vec<f32>) = pairs.iter().copied().unzip();
    let mut decisions = vec![Decision::BackendB; pairs.len()];
    router.route_batch(&queries, &worlds, &mut decisions)?;

    let backend_a = decisions.iter().filter(|d| d.is_backend_a()).count();
    tracing::info!(
        total = decisions.len(),
        backend_a,
        kernel = %router.kernel(),
        "Batch routed"
    );

    if json {
        let entries: Vec<BatchEntry> = pairs
            .iter()
            .zip(&decisions)
            .map(|(&(query, world), &decision)| BatchEntry {
                query,
                world,
                decision,
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &entries)?;
        writeln!(out)?;
    } else {
        for decision in &decisions {
            writeln!(out, "{decision}")?;
        }
    }
    Ok(())
}

pub fn show_config(out: &mut impl Write, config: RouterConfig, json: bool) -> anyhow::Result<()> {
    let effective = EffectiveConfig {
        threshold: widen(config.threshold()),
        backend_a_available: config.backend_a_available(),
        forced_capability: config.forced_capability(),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &effective)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", toml::to_string(&effective)?)?;
    }
    Ok(())
}
