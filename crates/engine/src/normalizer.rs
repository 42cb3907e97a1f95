//! Converts raw judge-entered field values into a canonical
//! [`NormalizedScore`]. Every rule type reduces to a single ordering value in
//! the unit family's base (integer milliseconds for time, decimal meters for
//! distance, raw count for points) so ranking is a pure numeric comparison.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use storage::dto::submission::{FieldValue, SubmissionRequest};
use storage::models::{
    Aggregation, AttemptValue, FieldDefinition, FieldKind, NormalizedScore, RuleType, ScoreFamily,
    ScoringModel, SortDirection, TimeComponents,
};

use crate::error::{EngineError, Result};

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

struct CanonicalValue {
    value: Decimal,
    unit: &'static str,
    time_components: Option<TimeComponents>,
    attempts: Option<BTreeMap<String, AttemptValue>>,
}

/// Resolves a submission into a persisted-shape score. The rule type comes
/// from the request's modality metadata; the model is consulted only for
/// [`RuleType::Dynamic`].
pub fn normalize(
    request: &SubmissionRequest,
    model: Option<&ScoringModel>,
) -> Result<NormalizedScore> {
    let canonical = match request.rule_type {
        RuleType::Time => normalize_time(&request.fields)?,
        RuleType::Distance => normalize_distance(&request.fields)?,
        RuleType::Points => normalize_points(&request.fields)?,
        RuleType::Attempts(family) => normalize_attempts(family, &request.fields)?,
        RuleType::Dynamic => normalize_dynamic(&request.fields, model)?,
    };

    Ok(NormalizedScore {
        score_id: Uuid::new_v4(),
        event_id: request.event_id,
        modality_id: request.modality_id,
        athlete_id: request.athlete_id,
        team_id: None,
        judge_id: request.judge_id,
        heat: request.heat,
        value: canonical.value,
        unit: canonical.unit.to_string(),
        time_components: canonical.time_components,
        attempts: canonical.attempts,
        notes: request.notes.clone(),
        position: None,
        medal: None,
        recorded_at: chrono::Utc::now().naive_utc(),
    })
}

fn normalize_family(
    family: ScoreFamily,
    fields: &BTreeMap<String, FieldValue>,
) -> Result<CanonicalValue> {
    match family {
        ScoreFamily::Time => normalize_time(fields),
        ScoreFamily::Distance => normalize_distance(fields),
        ScoreFamily::Points => normalize_points(fields),
    }
}

fn normalize_time(fields: &BTreeMap<String, FieldValue>) -> Result<CanonicalValue> {
    if !fields.contains_key("minutes")
        && !fields.contains_key("seconds")
        && !fields.contains_key("milliseconds")
    {
        // Documented fallback: a submission with no time components is
        // recorded as an explicit zero, not rejected. Consumers surface the
        // zeroed components as "no time entered".
        tracing::debug!("time submission without components; recording explicit zero");
        return Ok(CanonicalValue {
            value: Decimal::ZERO,
            unit: ScoreFamily::Time.unit(),
            time_components: Some(TimeComponents::zero()),
            attempts: None,
        });
    }

    let minutes = integer_component(fields, "minutes", None)?;
    let seconds = integer_component(fields, "seconds", Some(59))?;
    let milliseconds = integer_component(fields, "milliseconds", Some(999))?;

    // Minutes have no configured upper bound, so the conversion must not
    // wrap; an entry too large for the millisecond range is a bad entry.
    let total = minutes
        .checked_mul(MS_PER_MINUTE)
        .and_then(|ms| ms.checked_add(seconds * MS_PER_SECOND))
        .and_then(|ms| ms.checked_add(milliseconds))
        .ok_or_else(|| {
            EngineError::validation("minutes", "time value overflows the millisecond range")
        })?;
    Ok(CanonicalValue {
        value: Decimal::from(total),
        unit: ScoreFamily::Time.unit(),
        time_components: Some(TimeComponents {
            minutes: minutes as u32,
            seconds: seconds as u32,
            milliseconds: milliseconds as u32,
        }),
        attempts: None,
    })
}

fn normalize_distance(fields: &BTreeMap<String, FieldValue>) -> Result<CanonicalValue> {
    if !fields.contains_key("meters") {
        return Err(EngineError::validation("meters", "required field is missing"));
    }
    let meters = integer_component(fields, "meters", None)?;
    let centimeters = integer_component(fields, "centimeters", Some(99))?;

    Ok(CanonicalValue {
        value: Decimal::from(meters) + Decimal::new(centimeters, 2),
        unit: ScoreFamily::Distance.unit(),
        time_components: None,
        attempts: None,
    })
}

fn normalize_points(fields: &BTreeMap<String, FieldValue>) -> Result<CanonicalValue> {
    let score = fields
        .get("score")
        .ok_or_else(|| EngineError::validation("score", "required field is missing"))?
        .as_number()
        .ok_or_else(|| EngineError::validation("score", "expected a number"))?;

    if score < Decimal::ZERO {
        return Err(EngineError::validation("score", "must be non-negative"));
    }

    Ok(CanonicalValue {
        value: score,
        unit: ScoreFamily::Points.unit(),
        time_components: None,
        attempts: None,
    })
}

fn normalize_attempts(
    family: ScoreFamily,
    fields: &BTreeMap<String, FieldValue>,
) -> Result<CanonicalValue> {
    let attempts = fields
        .get("attempts")
        .ok_or_else(|| EngineError::validation("attempts", "required field is missing"))?
        .as_attempts()
        .ok_or_else(|| EngineError::validation("attempts", "expected a list of attempts"))?;

    if attempts.is_empty() {
        return Err(EngineError::validation("attempts", "at least one attempt is required"));
    }

    let mut captured = BTreeMap::new();
    let mut best: Option<CanonicalValue> = None;

    for (index, raw) in attempts.iter().enumerate() {
        let sub_fields: BTreeMap<String, FieldValue> = raw
            .iter()
            .map(|(key, value)| (key.clone(), FieldValue::Number(*value)))
            .collect();
        let candidate = normalize_family(family, &sub_fields)?;
        captured.insert(
            format!("attempt_{}", index + 1),
            AttemptValue::Number(candidate.value),
        );

        let is_better = match &best {
            None => true,
            Some(current) => match family.direction() {
                SortDirection::Ascending => candidate.value < current.value,
                SortDirection::Descending => candidate.value > current.value,
            },
        };
        if is_better {
            best = Some(candidate);
        }
    }

    // Non-empty list guarantees a best attempt.
    let best = best
        .ok_or_else(|| EngineError::validation("attempts", "at least one attempt is required"))?;
    Ok(CanonicalValue {
        value: best.value,
        unit: family.unit(),
        time_components: best.time_components,
        attempts: Some(captured),
    })
}

fn normalize_dynamic(
    fields: &BTreeMap<String, FieldValue>,
    model: Option<&ScoringModel>,
) -> Result<CanonicalValue> {
    let scoring_fields = model.map(ScoringModel::scoring_fields).unwrap_or_default();
    if scoring_fields.is_empty() {
        tracing::debug!("no scoring fields configured; falling back to points rule");
        return normalize_points(fields);
    }

    let mut captured: BTreeMap<String, AttemptValue> = BTreeMap::new();

    for definition in scoring_fields.iter().filter(|d| d.is_editable()) {
        match fields.get(&definition.key) {
            None if definition.required => {
                return Err(EngineError::validation(&definition.key, "required field is missing"));
            }
            None => continue,
            Some(value) => {
                let validated = validate_field(definition, value)?;
                captured.insert(definition.key.clone(), validated);
            }
        }
    }

    // Calculated fields are derived from the captured values, never read
    // from raw input.
    let mut calculated: Option<Decimal> = None;
    for definition in scoring_fields.iter().filter(|d| !d.is_editable()) {
        let FieldKind::Calculated { formula } = &definition.kind else {
            continue;
        };
        let result = aggregate(*formula, &captured);
        captured.insert(definition.key.clone(), AttemptValue::Number(result));
        calculated.get_or_insert(result);
    }

    let value = calculated.unwrap_or_else(|| sum_numeric(&captured));
    Ok(CanonicalValue {
        value,
        unit: ScoreFamily::Points.unit(),
        time_components: None,
        attempts: Some(captured),
    })
}

fn validate_field(definition: &FieldDefinition, value: &FieldValue) -> Result<AttemptValue> {
    let key = definition.key.as_str();
    match &definition.kind {
        FieldKind::Number { min, max, .. } => {
            let number = value
                .as_number()
                .ok_or_else(|| EngineError::validation(key, "expected a number"))?;
            if let Some(min) = min {
                if number < *min {
                    return Err(EngineError::validation(key, format!("must be at least {min}")));
                }
            }
            if let Some(max) = max {
                if number > *max {
                    return Err(EngineError::validation(key, format!("must be at most {max}")));
                }
            }
            Ok(AttemptValue::Number(number))
        }
        FieldKind::Integer { min, max } => {
            let number = value
                .as_number()
                .ok_or_else(|| EngineError::validation(key, "expected a number"))?;
            if !number.fract().is_zero() {
                return Err(EngineError::validation(key, "expected an integer"));
            }
            let integer = number
                .to_i64()
                .ok_or_else(|| EngineError::validation(key, "out of integer range"))?;
            if let Some(min) = min {
                if integer < *min {
                    return Err(EngineError::validation(key, format!("must be at least {min}")));
                }
            }
            if let Some(max) = max {
                if integer > *max {
                    return Err(EngineError::validation(key, format!("must be at most {max}")));
                }
            }
            Ok(AttemptValue::Number(number))
        }
        FieldKind::Text => {
            let text = value
                .as_text()
                .ok_or_else(|| EngineError::validation(key, "expected text"))?;
            Ok(AttemptValue::Text(text.to_string()))
        }
        FieldKind::Select { options } => {
            let text = value
                .as_text()
                .ok_or_else(|| EngineError::validation(key, "expected a selected option"))?;
            if !options.iter().any(|option| option == text) {
                return Err(EngineError::validation(key, "not a valid option"));
            }
            Ok(AttemptValue::Text(text.to_string()))
        }
        FieldKind::Calculated { .. } => {
            Err(EngineError::validation(key, "calculated fields are not judge-editable"))
        }
    }
}

fn aggregate(formula: Aggregation, captured: &BTreeMap<String, AttemptValue>) -> Decimal {
    let numbers = captured.values().filter_map(|value| match value {
        AttemptValue::Number(n) => Some(*n),
        AttemptValue::Text(_) => None,
    });
    match formula {
        Aggregation::Sum => numbers.sum(),
        Aggregation::Best => numbers.max().unwrap_or(Decimal::ZERO),
    }
}

fn sum_numeric(captured: &BTreeMap<String, AttemptValue>) -> Decimal {
    captured
        .values()
        .filter_map(|value| match value {
            AttemptValue::Number(n) => Some(*n),
            AttemptValue::Text(_) => None,
        })
        .sum()
}

/// Reads an integer component, treating an absent key as zero. `max` bounds
/// the component (59 for seconds, 999 for milliseconds, 99 for centimeters);
/// out-of-range values are rejected, never clamped.
fn integer_component(
    fields: &BTreeMap<String, FieldValue>,
    key: &str,
    max: Option<i64>,
) -> Result<i64> {
    let Some(value) = fields.get(key) else {
        return Ok(0);
    };
    let number = value
        .as_number()
        .ok_or_else(|| EngineError::validation(key, "expected a number"))?;
    if !number.fract().is_zero() {
        return Err(EngineError::validation(key, "expected an integer"));
    }
    let integer = number
        .to_i64()
        .ok_or_else(|| EngineError::validation(key, "out of integer range"))?;
    if integer < 0 {
        return Err(EngineError::validation(key, "must be non-negative"));
    }
    if let Some(max) = max {
        if integer > max {
            return Err(EngineError::validation(key, format!("must be at most {max}")));
        }
    }
    Ok(integer)
}
