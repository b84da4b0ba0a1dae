//! Synchronous, side-effect free field validation.

use std::{fmt, sync::OnceLock};

use regex::Regex;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    PostalCode,
    Positive,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("is required"),
            Rule::MinLength(n) => write!(f, "must have at least {n} characters"),
            Rule::MaxLength(n) => write!(f, "must have at most {n} characters"),
            Rule::PostalCode => f.write_str("must look like 00000-000"),
            Rule::Positive => f.write_str("must be greater than zero"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
}

/// Every violation found in a draft, in field declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    violations: Vec<FieldViolation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn rules_for(&self, field: &str) -> Vec<Rule> {
        self.violations
            .iter()
            .filter(|v| v.field == field)
            .map(|v| v.rule)
            .collect()
    }

    pub fn push(&mut self, field: &'static str, rule: Rule) {
        self.violations.push(FieldViolation { field, rule });
    }

    pub fn text<'r, 'v>(&'r mut self, field: &'static str, value: Option<&'v str>) -> TextCheck<'r, 'v> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        TextCheck {
            report: self,
            field,
            value,
            failed: false,
        }
    }

    pub fn required<T>(&mut self, field: &'static str, value: Option<&T>) {
        if value.is_none() {
            self.push(field, Rule::Required);
        }
    }

    pub fn positive_amount(&mut self, field: &'static str, value: Option<Decimal>) {
        match value {
            None => self.push(field, Rule::Required),
            Some(amount) if amount <= Decimal::ZERO => self.push(field, Rule::Positive),
            Some(_) => {}
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{} {}", v.field, v.rule)?;
        }
        Ok(())
    }
}

/// Chained checks on one text field. Blank input counts as absent, and once
/// a check fails the remaining ones are skipped.
pub struct TextCheck<'r, 'v> {
    report: &'r mut ValidationReport,
    field: &'static str,
    value: Option<&'v str>,
    failed: bool,
}

impl TextCheck<'_, '_> {
    pub fn required(mut self) -> Self {
        if !self.failed && self.value.is_none() {
            self.fail(Rule::Required);
        }
        self
    }

    pub fn min_len(mut self, min: usize) -> Self {
        if let Some(value) = self.value.filter(|_| !self.failed) {
            if value.chars().count() < min {
                self.fail(Rule::MinLength(min));
            }
        }
        self
    }

    pub fn max_len(mut self, max: usize) -> Self {
        if let Some(value) = self.value.filter(|_| !self.failed) {
            if value.chars().count() > max {
                self.fail(Rule::MaxLength(max));
            }
        }
        self
    }

    pub fn postal_code(mut self) -> Self {
        if let Some(value) = self.value.filter(|_| !self.failed) {
            if !is_postal_code(value) {
                self.fail(Rule::PostalCode);
            }
        }
        self
    }

    fn fail(&mut self, rule: Rule) {
        self.failed = true;
        self.report.push(self.field, rule);
    }
}

/// `NNNNN-NNN` with ASCII digits only.
pub fn is_postal_code(value: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[0-9]{5}-[0-9]{3}$").expect("postal code pattern compiles"))
        .is_match(value)
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
