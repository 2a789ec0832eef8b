//! Report Generation
//!
//! Converts a finished run into a serializable [`RunReport`], and renders
//! step-by-step fraction traces.

use degroot_events::{BeliefSnapshot, RunReport};

use crate::config::{DisplayConfig, IterationConfig};
use crate::markup;
use crate::model::{BeliefModel, Iteration};
use crate::rational::{format_all, FormatError};

/// Builds a report for `model` after `iteration` was produced by it.
///
/// Fractions and markup describe the model's final beliefs.
pub fn build_report(
    model: &BeliefModel,
    iteration: &Iteration,
    limits: &IterationConfig,
    display: &DisplayConfig,
) -> Result<RunReport, FormatError> {
    let history = iteration
        .history
        .iter()
        .enumerate()
        .map(|(step, beliefs)| BeliefSnapshot::new(step, beliefs.clone()))
        .collect();

    let final_fractions = format_all(model.beliefs(), display.text_max_denominator)?;
    let markup = markup::render(
        model.beliefs(),
        model.trust(),
        display.markup_max_denominator,
    )?;

    Ok(RunReport {
        agents: model.agent_count(),
        converged: iteration.converged,
        steps: iteration.steps,
        max_steps: limits.max_steps,
        tolerance: limits.tolerance,
        history,
        final_beliefs: model.beliefs().to_vec(),
        final_fractions: Some(final_fractions),
        edges: model.trust().edges(),
        markup: Some(markup),
    })
}

/// Steps `model` `count` times and returns one `[Step    n] fractions` line
/// for the starting state and for each step after it.
pub fn step_trace(
    model: &mut BeliefModel,
    count: usize,
    display: &DisplayConfig,
) -> Result<Vec<String>, FormatError> {
    let mut lines = Vec::with_capacity(count + 1);
    lines.push(trace_line(model, 0, display)?);
    for n in 1..=count {
        model.step();
        lines.push(trace_line(model, n, display)?);
    }
    Ok(lines)
}

fn trace_line(
    model: &BeliefModel,
    n: usize,
    display: &DisplayConfig,
) -> Result<String, FormatError> {
    Ok(format!(
        "[Step {:>4}] {}",
        n,
        model.fraction_line(display.text_max_denominator)?
    ))
}
