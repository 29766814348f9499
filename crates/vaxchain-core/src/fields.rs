//! Building typed records from flat, ordered string arguments.
//!
//! Every builder goes through [`Fields`], so arity, natural-key and numeric
//! checks behave the same for all record types: the first failing check
//! rejects the whole request before anything touches the ledger.

use crate::{
  Error, Result,
  command::Function,
  record::{ChildDetails, VaccinationInfo},
};

/// A borrowed argument list whose length has already been checked.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
  args: &'a [String],
}

impl<'a> Fields<'a> {
  /// Fails with [`Error::Arity`] unless exactly `expected` arguments are given.
  pub fn new(function: Function, args: &'a [String], expected: usize) -> Result<Self> {
    if args.len() != expected {
      return Err(Error::Arity { function, expected, got: args.len() });
    }
    Ok(Self { args })
  }

  /// Free text at `index`, taken as-is.
  pub fn text(&self, index: usize) -> String { self.args[index].clone() }

  /// A natural key at `index`; must be non-empty.
  pub fn key(&self, index: usize, field: &'static str) -> Result<String> {
    let value = &self.args[index];
    if value.is_empty() {
      return Err(Error::Validation {
        field,
        position: index + 1,
        reason: "must not be empty".to_owned(),
      });
    }
    Ok(value.clone())
  }

  /// A signed decimal integer at `index`.
  pub fn integer(&self, index: usize, field: &'static str) -> Result<i64> {
    let value = &self.args[index];
    value.parse().map_err(|_| Error::Validation {
      field,
      position: index + 1,
      reason: format!("must be a numeric string, got {value:?}"),
    })
  }
}

/// A record that can be built from a command's argument list.
pub trait FromArgs: Sized {
  const FUNCTION: Function;
  const ARITY: usize;

  fn from_fields(fields: Fields<'_>) -> Result<Self>;

  fn from_args(args: &[String]) -> Result<Self> {
    Self::from_fields(Fields::new(Self::FUNCTION, args, Self::ARITY)?)
  }
}

impl FromArgs for ChildDetails {
  const FUNCTION: Function = Function::AddChildInfo;
  const ARITY: usize = 10;

  fn from_fields(f: Fields<'_>) -> Result<Self> {
    Ok(Self {
      birth_cert_id: f.key(0, "BirthCertID")?,
      child_name:    f.text(1),
      father_name:   f.text(2),
      father_dob:    f.text(3),
      father_id:     f.text(4),
      father_mobile: f.integer(5, "FatherMobile")?,
      birth_date:    f.text(6),
      birth_place:   f.text(7),
      birth_time:    f.integer(8, "BirthTime")?,
      address:       f.text(9),
    })
  }
}

impl FromArgs for VaccinationInfo {
  const FUNCTION: Function = Function::UpdateVaccinationInfo;
  const ARITY: usize = 6;

  fn from_fields(f: Fields<'_>) -> Result<Self> {
    Ok(Self {
      vaccine_id:          f.key(0, "VaccineID")?,
      vaccine_name:        f.text(1),
      quantity_prescribed: f.integer(2, "QuantityPrescribed")?,
      doses_prescribed:    f.integer(3, "DosesPrescribed")?,
      dose_interval:       f.integer(4, "DoseInterval")?,
      active:              f.integer(5, "Active")?,
    })
  }
}
