//! The command surface: four named functions taking ordered string arguments.
//!
//! | Function | Args | Result |
//! |----------|------|--------|
//! | `write` | key, value | [`Outcome::Empty`] |
//! | `read` | key | [`Outcome::State`] |
//! | `addChildInfo` | 10 [`ChildDetails`] fields | [`Outcome::Record`] |
//! | `updateVaccinationInfo` | 6 [`VaccinationInfo`] fields | [`Outcome::Record`] |

use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
  Error, Result,
  fields::{Fields, FromArgs},
  ledger::Ledger,
  record::{ChildDetails, Record, VaccinationInfo},
  store::RecordStore,
};

// ─── Function names ──────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Display,
  EnumString,
  EnumIter,
  IntoStaticStr,
)]
#[strum(serialize_all = "camelCase")]
pub enum Function {
  Write,
  Read,
  AddChildInfo,
  UpdateVaccinationInfo,
}

impl Function {
  /// Number of arguments the function takes.
  pub fn arity(self) -> usize {
    match self {
      Self::Write => 2,
      Self::Read => 1,
      Self::AddChildInfo => ChildDetails::ARITY,
      Self::UpdateVaccinationInfo => VaccinationInfo::ARITY,
    }
  }

  /// Look up a function by its invocation name.
  pub fn lookup(name: &str) -> Result<Self> {
    Self::from_str(name).map_err(|_| Error::UnknownCommand(name.to_owned()))
  }
}

// ─── Commands ────────────────────────────────────────────────────────────────

/// A fully validated invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Write { key: String, value: String },
  Read { key: String },
  AddChildInfo(ChildDetails),
  UpdateVaccinationInfo(VaccinationInfo),
}

impl Command {
  /// Validate `args` for the function called `name`.
  ///
  /// Nothing here touches the ledger, so a rejected command leaves no trace.
  pub fn parse(name: &str, args: &[String]) -> Result<Self> {
    let function = Function::lookup(name)?;
    match function {
      Function::Write => {
        let f = Fields::new(function, args, function.arity())?;
        Ok(Self::Write { key: f.text(0), value: f.text(1) })
      }
      Function::Read => {
        let f = Fields::new(function, args, function.arity())?;
        Ok(Self::Read { key: f.text(0) })
      }
      Function::AddChildInfo => ChildDetails::from_args(args).map(Self::AddChildInfo),
      Function::UpdateVaccinationInfo => {
        VaccinationInfo::from_args(args).map(Self::UpdateVaccinationInfo)
      }
    }
  }

  pub fn function(&self) -> Function {
    match self {
      Self::Write { .. } => Function::Write,
      Self::Read { .. } => Function::Read,
      Self::AddChildInfo(_) => Function::AddChildInfo,
      Self::UpdateVaccinationInfo(_) => Function::UpdateVaccinationInfo,
    }
  }
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  Empty,
  /// Raw bytes read from the ledger.
  State(Vec<u8>),
  /// JSON of the record that was appended, and the key it went under.
  Record { key: String, json: Vec<u8> },
}

impl Outcome {
  pub fn payload(&self) -> &[u8] {
    match self {
      Self::Empty => &[],
      Self::State(bytes) => bytes.as_slice(),
      Self::Record { json, .. } => json.as_slice(),
    }
  }
}

// ─── Dispatch ────────────────────────────────────────────────────────────────

impl<L: Ledger> RecordStore<L> {
  /// Run a validated command.
  pub async fn execute(&self, command: Command) -> Result<Outcome> {
    match command {
      Command::Write { key, value } => {
        self.write(&key, value.into_bytes()).await?;
        Ok(Outcome::Empty)
      }
      Command::Read { key } => self.read(&key).await.map(Outcome::State),
      Command::AddChildInfo(child) => self.append_and_echo(child).await,
      Command::UpdateVaccinationInfo(info) => self.append_and_echo(info).await,
    }
  }

  /// Parse and run `name(args)`.
  pub async fn invoke(&self, name: &str, args: &[String]) -> Result<Outcome> {
    let command = Command::parse(name, args)?;
    tracing::debug!(function = %command.function(), "invoking");
    self.execute(command).await
  }

  async fn append_and_echo<R: Record>(&self, record: R) -> Result<Outcome> {
    let json = serde_json::to_vec(&record)?;
    let receipt = self.append_keyed(record).await?;
    Ok(Outcome::Record { key: receipt.key, json })
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;
  use crate::{
    fields::tests::{amy_args, args},
    memory::MemoryLedger,
    record::tests::{amy, bcg},
  };

  fn store() -> RecordStore<MemoryLedger> { RecordStore::new(MemoryLedger::new()) }

  #[test]
  fn function_names_round_trip() {
    for function in Function::iter() {
      assert_eq!(Function::lookup(&function.to_string()).unwrap(), function);
    }
    assert_eq!(Function::AddChildInfo.to_string(), "addChildInfo");
    assert_eq!(
      <&'static str>::from(Function::UpdateVaccinationInfo),
      "updateVaccinationInfo"
    );
  }

  #[test]
  fn unknown_function_is_named() {
    let err = Command::parse("init", &args(&["x"])).unwrap_err();
    assert!(matches!(err, Error::UnknownCommand(ref name) if name == "init"));
    assert_eq!(err.to_string(), "received unknown function invocation: init");
  }

  #[test]
  fn write_and_read_check_arity() {
    assert!(matches!(
      Command::parse("write", &args(&["k"])),
      Err(Error::Arity { expected: 2, got: 1, .. })
    ));
    assert!(matches!(
      Command::parse("read", &args(&[])),
      Err(Error::Arity { expected: 1, got: 0, .. })
    ));
  }

  #[tokio::test]
  async fn add_child_info_appends_under_derived_key() {
    let s = store();
    let outcome = s.invoke("addChildInfo", &amy_args()).await.unwrap();

    let Outcome::Record { key, json } = outcome else {
      panic!("expected a record outcome");
    };
    assert_eq!(key, "BC1_2");
    let echoed: ChildDetails = serde_json::from_slice(&json).unwrap();
    assert_eq!(echoed, amy());

    let stored: Vec<ChildDetails> = s.load("BC1_2").await.unwrap();
    assert_eq!(stored, vec![amy()]);
  }

  #[tokio::test]
  async fn update_vaccination_info_appends_under_derived_key() {
    let s = store();
    let input = args(&["V1", "BCG", "1", "3", "30", "1"]);
    s.invoke("updateVaccinationInfo", &input).await.unwrap();
    s.invoke("updateVaccinationInfo", &input).await.unwrap();

    let stored: Vec<VaccinationInfo> = s.load("V1_2").await.unwrap();
    assert_eq!(stored, vec![bcg(), bcg()]);
  }

  #[tokio::test]
  async fn rejected_command_writes_nothing() {
    let s = store();
    let err = s
      .invoke("updateVaccinationInfo", &args(&["V1", "BCG", "x", "3", "30", "1"]))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Validation { field: "QuantityPrescribed", .. }));
    assert!(err.is_rejection());
    assert!(s.ledger().is_empty());
  }

  #[tokio::test]
  async fn write_then_read_is_idempotent() {
    let s = store();
    assert_eq!(
      s.invoke("write", &args(&["greeting", "hello"])).await.unwrap(),
      Outcome::Empty
    );
    let first = s.invoke("read", &args(&["greeting"])).await.unwrap();
    let second = s.invoke("read", &args(&["greeting"])).await.unwrap();
    assert_eq!(first, Outcome::State(b"hello".to_vec()));
    assert_eq!(first, second);
  }

  #[tokio::test]
  async fn read_of_absent_key_is_empty() {
    let outcome = store().invoke("read", &args(&["nothing"])).await.unwrap();
    assert!(outcome.payload().is_empty());
  }
}
