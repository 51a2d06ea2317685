use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use strum::{Display, EnumString, IntoStaticStr};
use tracing::debug;

use crate::{
    algorithms::{biggest_contour, convex_hull, convexity_defects},
    error::{FingerError, Result},
    geometry::{angle_at, distance},
    types::{BoundingBox, Contour, ContourSet, Defect, DefectReport, DrawCommand, FrameResult, Palette, Rgb},
};

/// Limits of the finger-valley test. Lengths scale with the height of the
/// analysed contour's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Thresholds {
    /// Defects at or below this depth (pixels) are noise.
    pub min_depth: f64,
    /// Both triangle legs must be longer than `bbox.height / span_divisor`.
    pub span_divisor: f64,
    /// Valley angle must be strictly below this many degrees.
    pub max_angle_deg: f64,
    /// Bottom share of the bounding box treated as wrist.
    #[schemars(range(min = 0.0, max = 1.0))]
    pub wrist_fraction: f64,
    #[schemars(range(min = 1))]
    pub max_fingers: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_depth: 10.0,
            span_divisor: 5.0,
            max_angle_deg: 95.0,
            wrist_fraction: 0.25,
            max_fingers: 5,
        }
    }
}

impl Thresholds {
    /// Reject limits under which the test or the cap cannot hold.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_depth >= 0.0) {
            return Err(FingerError::InvalidConfig("thresholds.min_depth must be >= 0".into()));
        }
        if !(self.span_divisor > 0.0) {
            return Err(FingerError::InvalidConfig("thresholds.span_divisor must be > 0".into()));
        }
        if !(0.0..=180.0).contains(&self.max_angle_deg) {
            return Err(FingerError::InvalidConfig("thresholds.max_angle_deg must be within 0-180".into()));
        }
        if !(0.0..=1.0).contains(&self.wrist_fraction) {
            return Err(FingerError::InvalidConfig("thresholds.wrist_fraction must be within 0-1".into()));
        }
        // a found hand always counts at least 1
        if self.max_fingers == 0 {
            return Err(FingerError::InvalidConfig("thresholds.max_fingers must be at least 1".into()));
        }
        Ok(())
    }
}

/// Why a deep enough defect was not counted as a finger valley.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    ShortStart,
    ShortEnd,
    WideAngle,
    BelowWrist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Verdict {
    /// Too shallow to be considered at all
    Discarded,
    Finger,
    Rejected(Rejection),
}

/// Measure one defect and run the finger-valley test on it.
pub fn assess(defect: &Defect, contour: &Contour, bbox: &BoundingBox, thresholds: &Thresholds) -> DefectReport {
    let start = contour.points[defect.start];
    let end = contour.points[defect.end];
    let far = contour.points[defect.far];

    let start_to_far = distance(start, far);
    let end_to_far = distance(end, far);
    let angle_deg = angle_at(start, end, far);

    let height = bbox.height as f64;
    let span = height / thresholds.span_divisor;
    let wrist = bbox.bottom() as f64 - height * thresholds.wrist_fraction;

    // Negated comparisons so that a NaN measurement fails its test.
    let verdict = if !(defect.depth > thresholds.min_depth) {
        Verdict::Discarded
    } else if !(start_to_far > span) {
        Verdict::Rejected(Rejection::ShortStart)
    } else if !(end_to_far > span) {
        Verdict::Rejected(Rejection::ShortEnd)
    } else if !(angle_deg < thresholds.max_angle_deg) {
        Verdict::Rejected(Rejection::WideAngle)
    } else if !(start.y <= wrist && end.y <= wrist) {
        Verdict::Rejected(Rejection::BelowWrist)
    } else {
        Verdict::Finger
    };

    DefectReport {
        defect: *defect,
        start,
        end,
        far,
        start_to_far,
        end_to_far,
        angle_deg,
        verdict,
    }
}

/// Whether `defect` lies between two extended fingers.
pub fn classify(defect: &Defect, contour: &Contour, bbox: &BoundingBox, thresholds: &Thresholds) -> Verdict {
    assess(defect, contour, bbox, thresholds).verdict
}

/// Analyse the biggest contour of `set` and count fingers.
///
/// With no contour the result is the "no hand" value: count 0 and nothing to
/// draw. Otherwise the count starts at 1 and each finger valley adds one, up
/// to `thresholds.max_fingers`.
pub fn count_fingers(set: &ContourSet, thresholds: &Thresholds, palette: &Palette) -> FrameResult {
    let Some(selected) = biggest_contour(set) else {
        return FrameResult::no_hand();
    };
    let contour = &set.contours[selected];
    let bounding_box = contour.bounding_box();

    let mut result = FrameResult {
        finger_count: 1,
        selected: Some(selected),
        bounding_box,
        defects: Vec::new(),
        draw_commands: vec![DrawCommand::Polyline {
            points: contour.points.clone(),
            color: palette.selected_contour,
            thickness: 2,
        }],
    };

    let hull = convex_hull(contour);
    if let Some(bbox) = bounding_box {
        for defect in convexity_defects(contour, &hull) {
            let report = assess(&defect, contour, &bbox, thresholds);
            let color = match report.verdict {
                Verdict::Discarded => None,
                Verdict::Finger => {
                    if result.finger_count < thresholds.max_fingers {
                        result.finger_count += 1;
                    }
                    debug!(
                        start_to_far = report.start_to_far,
                        end_to_far = report.end_to_far,
                        angle = report.angle_deg,
                        depth = defect.depth,
                        "finger valley"
                    );
                    Some(palette.finger)
                }
                Verdict::Rejected(reason) => {
                    debug!(%reason, angle = report.angle_deg, depth = defect.depth, "rejected defect");
                    Some(palette.rejected)
                }
            };
            if let Some(color) = color {
                push_valley(&mut result.draw_commands, &report, color);
            }
            result.defects.push(report);
        }
    }

    result.draw_commands.push(DrawCommand::Polyline {
        points: hull.points(contour),
        color: palette.hull,
        thickness: 2,
    });
    for (i, other) in set.iter().enumerate() {
        if i != selected {
            result.draw_commands.push(DrawCommand::Polyline {
                points: other.points.clone(),
                color: palette.other_contour,
                thickness: 1,
            });
        }
    }

    result
}

fn push_valley(commands: &mut Vec<DrawCommand>, report: &DefectReport, color: Rgb) {
    let line = |from, to| DrawCommand::Line { from, to, color, thickness: 2 };
    commands.push(line(report.start, report.end));
    commands.push(line(report.start, report.far));
    commands.push(line(report.end, report.far));
    commands.push(DrawCommand::Circle {
        center: report.far,
        radius: 4,
        color,
        thickness: 2,
    });
}
