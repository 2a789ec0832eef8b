//! LaTeX `pmatrix` rendering of beliefs and trust as fractions.

use degroot_events::MarkupPair;

use crate::rational::{format_all, FormatError};
use crate::trust::TrustMatrix;

const BEGIN: &str = r"\begin{pmatrix}";
const END: &str = r"\end{pmatrix}";
/// Terminates every row
const ROW_END: &str = r"\\";
/// Separates matrix columns
const COLUMN_SEP: &str = "&";

/// Column vector with one belief per row.
pub fn belief_column(beliefs: &[f64], max_denominator: u64) -> Result<String, FormatError> {
    let cells = format_all(beliefs, max_denominator)?;

    let mut out = String::from(BEGIN);
    for cell in cells {
        out.push_str(&cell);
        out.push_str(ROW_END);
    }
    out.push_str(END);
    Ok(out)
}

/// Full trust matrix, columns joined by `&`.
pub fn trust_matrix(trust: &TrustMatrix, max_denominator: u64) -> Result<String, FormatError> {
    let rows = format_all(trust, max_denominator)?;

    let mut out = String::from(BEGIN);
    for row in rows {
        out.push_str(&row.join(COLUMN_SEP));
        out.push_str(ROW_END);
    }
    out.push_str(END);
    Ok(out)
}

/// Markup for one displayed frame.
///
/// `beliefs` may be any history frame; the trust matrix never changes.
pub fn render(
    beliefs: &[f64],
    trust: &TrustMatrix,
    max_denominator: u64,
) -> Result<MarkupPair, FormatError> {
    Ok(MarkupPair {
        beliefs: belief_column(beliefs, max_denominator)?,
        trust: trust_matrix(trust, max_denominator)?,
    })
}
