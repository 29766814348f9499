//! Record types — the units stored inside repository containers.
//!
//! Records are plain data. Field names on the wire are the PascalCase names
//! used by every other client of the ledger, so the serde renames below are
//! part of the storage format and must not drift.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::repository::{
  ChildDetailsRepository, Repository, VaccinationInfoRepository,
  VaccinationPlanRepository,
};

/// Suffix appended to a natural key to form its ledger key.
pub const STORAGE_KEY_SUFFIX: &str = "_2";

/// Suffix for vaccination plans. A child's ID is its birth certificate ID, so
/// plans need their own namespace next to the child's identity records.
pub const PLAN_KEY_SUFFIX: &str = "_plan";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A record type paired with the container that stores it.
pub trait Record:
  Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
  type Repository: Repository<Record = Self>;

  /// Human-readable name used in log events.
  const KIND: &'static str;

  /// Appended to the natural key to form the ledger key.
  const KEY_SUFFIX: &'static str = STORAGE_KEY_SUFFIX;

  /// The domain identifier the storage key is derived from.
  fn natural_key(&self) -> &str;

  /// Ledger key of the repository holding this type's records for
  /// `natural_key`.
  fn key_for(natural_key: &str) -> String { format!("{natural_key}{}", Self::KEY_SUFFIX) }

  fn storage_key(&self) -> String { Self::key_for(self.natural_key()) }
}

// ─── Child identity ──────────────────────────────────────────────────────────

/// Birth and identity record for a child, keyed by birth certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ChildDetails {
  #[serde(rename = "BirthCertID")]
  pub birth_cert_id: String,
  pub child_name:    String,
  pub father_name:   String,
  #[serde(rename = "FatherDOB")]
  pub father_dob:    String,
  #[serde(rename = "FatherID")]
  pub father_id:     String,
  pub father_mobile: i64,
  /// Date as entered; not parsed.
  pub birth_date:    String,
  pub birth_place:   String,
  pub birth_time:    i64,
  pub address:       String,
}

impl Record for ChildDetails {
  type Repository = ChildDetailsRepository;

  const KIND: &'static str = "child details";

  fn natural_key(&self) -> &str { &self.birth_cert_id }
}

// ─── Vaccine catalog ─────────────────────────────────────────────────────────

/// Reference data for one vaccine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaccinationInfo {
  #[serde(rename = "VaccineID")]
  pub vaccine_id:          String,
  pub vaccine_name:        String,
  /// Dose volume in ml.
  #[serde(alias = "QuantiyPrescribed")]
  pub quantity_prescribed: i64,
  pub doses_prescribed:    i64,
  /// Days between doses.
  ///
  /// Older writers emitted `DoseInterval` and `Active` under the same tag,
  /// which made both fields vanish from their output; hence the defaults.
  #[serde(default)]
  pub dose_interval:       i64,
  #[serde(default)]
  pub active:              i64,
}

impl VaccinationInfo {
  pub fn is_active(&self) -> bool { self.active != 0 }
}

impl Record for VaccinationInfo {
  type Repository = VaccinationInfoRepository;

  const KIND: &'static str = "vaccination info";

  fn natural_key(&self) -> &str { &self.vaccine_id }
}

// ─── Per-child schedule ──────────────────────────────────────────────────────

/// One vaccine's schedule for one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VaccinationPlan {
  #[serde(rename = "VaccineID")]
  pub vaccine_id:            String,
  pub vaccine_name:          String,
  pub child_name:            String,
  #[serde(rename = "ChildID")]
  pub child_id:              String,
  #[serde(rename = "ChildDOB")]
  pub child_dob:             String,
  pub prescribed_location:   String,
  pub actual_location:       String,
  pub last_dose_date:        String,
  pub next_dose_date:        String,
  pub total_dose_prescribed: i64,
  pub pending_dose:          i64,
  pub last_reminder_date:    String,
  pub next_reminder_date:    String,
}

impl Record for VaccinationPlan {
  type Repository = VaccinationPlanRepository;

  const KIND: &'static str = "vaccination plan";
  const KEY_SUFFIX: &'static str = PLAN_KEY_SUFFIX;

  fn natural_key(&self) -> &str { &self.child_id }
}

#[cfg(test)]
pub(crate) mod tests {
  use serde_json::json;

  use super::*;

  pub fn amy() -> ChildDetails {
    ChildDetails {
      birth_cert_id: "BC1".into(),
      child_name:    "Amy".into(),
      father_name:   "Bob".into(),
      father_dob:    "1980-01-01".into(),
      father_id:     "F1".into(),
      father_mobile: 9_998_887_777,
      birth_date:    "2020-05-01".into(),
      birth_place:   "CityX".into(),
      birth_time:    900,
      address:       "123 St".into(),
    }
  }

  pub fn bcg() -> VaccinationInfo {
    VaccinationInfo {
      vaccine_id:          "V1".into(),
      vaccine_name:        "BCG".into(),
      quantity_prescribed: 1,
      doses_prescribed:    3,
      dose_interval:       30,
      active:              1,
    }
  }

  pub fn bcg_plan(child_id: &str) -> VaccinationPlan {
    VaccinationPlan {
      vaccine_id:            "V1".into(),
      vaccine_name:          "BCG".into(),
      child_name:            "Amy".into(),
      child_id:              child_id.into(),
      child_dob:             "2020-05-01".into(),
      prescribed_location:   "CityX Clinic".into(),
      actual_location:       String::new(),
      last_dose_date:        String::new(),
      next_dose_date:        "2020-06-01".into(),
      total_dose_prescribed: 3,
      pending_dose:          3,
      last_reminder_date:    String::new(),
      next_reminder_date:    "2020-05-25".into(),
    }
  }

  #[test]
  fn child_details_uses_wire_names() {
    let value = serde_json::to_value(amy()).unwrap();
    assert_eq!(value["BirthCertID"], "BC1");
    assert_eq!(value["FatherDOB"], "1980-01-01");
    assert_eq!(value["FatherID"], "F1");
    assert_eq!(value["FatherMobile"], 9_998_887_777_i64);
    assert_eq!(value["BirthTime"], 900);
    assert_eq!(value.as_object().unwrap().len(), 10);
  }

  #[test]
  fn active_and_dose_interval_have_distinct_tags() {
    let value = serde_json::to_value(bcg()).unwrap();
    assert_eq!(value["DoseInterval"], 30);
    assert_eq!(value["Active"], 1);
    assert_eq!(value["QuantityPrescribed"], 1);
  }

  #[test]
  fn legacy_vaccination_info_still_decodes() {
    // Shape produced by older writers: misspelled quantity, no interval/active.
    let legacy = json!({
      "VaccineID": "V9",
      "VaccineName": "OPV",
      "QuantiyPrescribed": 2,
      "DosesPrescribed": 4,
    });
    let info: VaccinationInfo = serde_json::from_value(legacy).unwrap();
    assert_eq!(info.quantity_prescribed, 2);
    assert_eq!(info.doses_prescribed, 4);
    assert_eq!(info.dose_interval, 0);
    assert!(!info.is_active());
  }

  #[test]
  fn plan_round_trips() {
    let plan = bcg_plan("BC1");
    let bytes = serde_json::to_vec(&plan).unwrap();
    let back: VaccinationPlan = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(back, plan);
  }

  #[test]
  fn storage_key_is_natural_key_with_suffix() {
    assert_eq!(amy().storage_key(), "BC1_2");
    assert_eq!(bcg().storage_key(), "V1_2");
    assert_eq!(ChildDetails::key_for("BC9"), "BC9_2");
  }

  #[test]
  fn plans_do_not_share_keys_with_children() {
    assert_eq!(bcg_plan("BC1").storage_key(), "BC1_plan");
    assert_ne!(bcg_plan("BC1").storage_key(), amy().storage_key());
    assert_eq!(VaccinationPlan::key_for("BC1"), "BC1_plan");
  }
}
