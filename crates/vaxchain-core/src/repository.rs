//! Repository containers — an ordered sequence of records stored as a single
//! JSON document under one ledger key.
//!
//! Containers only ever grow. Insertion order is preserved and no uniqueness
//! is enforced on the contained records.

use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};

use crate::record::{ChildDetails, Record, VaccinationInfo, VaccinationPlan};

/// A container of same-typed records.
pub trait Repository: Default + Serialize + DeserializeOwned + Send {
  type Record: Record<Repository = Self>;

  fn records(&self) -> &[Self::Record];

  fn into_records(self) -> Vec<Self::Record>;

  fn push(&mut self, record: Self::Record);

  fn len(&self) -> usize { self.records().len() }

  fn is_empty(&self) -> bool { self.records().is_empty() }
}

/// Decode a stored container. Empty bytes and a JSON `null` document are both
/// an empty container.
pub fn decode<R: Repository>(raw: &[u8]) -> serde_json::Result<R> {
  if raw.is_empty() {
    return Ok(R::default());
  }
  Ok(serde_json::from_slice::<Option<R>>(raw)?.unwrap_or_default())
}

pub fn encode<R: Repository>(repository: &R) -> serde_json::Result<Vec<u8>> {
  serde_json::to_vec(repository)
}

/// Older writers emitted `null` for an empty record list.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

macro_rules! repository {
  ($(#[$meta:meta])* $name:ident, $record:ty, $field:ident, $tag:literal) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct $name {
      #[serde(rename = $tag, default, deserialize_with = "null_as_empty")]
      pub $field: Vec<$record>,
    }

    impl Repository for $name {
      type Record = $record;

      fn records(&self) -> &[$record] { &self.$field }

      fn into_records(self) -> Vec<$record> { self.$field }

      fn push(&mut self, record: $record) { self.$field.push(record); }
    }
  };
}

repository!(
  /// Stored as `{"Child_Details": [...]}`.
  ChildDetailsRepository,
  ChildDetails,
  child_details,
  "Child_Details"
);

repository!(
  /// Stored as `{"Vaccination_Info": [...]}`.
  VaccinationInfoRepository,
  VaccinationInfo,
  vaccination_info,
  "Vaccination_Info"
);

repository!(
  /// Stored as `{"Vaccination_Plan": [...]}`.
  VaccinationPlanRepository,
  VaccinationPlan,
  vaccination_plan,
  "Vaccination_Plan"
);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record::tests::{amy, bcg};

  #[test]
  fn empty_and_null_decode_to_empty_container() {
    let cases: [&[u8]; 4] = [b"", b"null", b"{}", br#"{"Child_Details":null}"#];
    for raw in cases {
      let repo: ChildDetailsRepository = decode(raw).unwrap();
      assert!(repo.is_empty(), "{:?}", String::from_utf8_lossy(raw));
    }
  }

  #[test]
  fn encodes_under_container_tag() {
    let mut repo = VaccinationInfoRepository::default();
    repo.push(bcg());
    let value: serde_json::Value =
      serde_json::from_slice(&encode(&repo).unwrap()).unwrap();
    assert_eq!(value["Vaccination_Info"][0]["VaccineID"], "V1");
  }

  #[test]
  fn preserves_insertion_order_and_duplicates() {
    let mut repo = ChildDetailsRepository::default();
    let mut second = amy();
    second.child_name = "Amy Again".into();
    repo.push(amy());
    repo.push(second.clone());
    repo.push(amy());

    let back: ChildDetailsRepository = decode(&encode(&repo).unwrap()).unwrap();
    assert_eq!(back.len(), 3);
    assert_eq!(back.records()[1], second);
    assert_eq!(back.records()[0], back.records()[2]);
  }

  #[test]
  fn other_container_type_is_rejected() {
    let mut children = ChildDetailsRepository::default();
    children.push(amy());
    let raw = encode(&children).unwrap();
    assert!(decode::<VaccinationPlanRepository>(&raw).is_err());
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(decode::<ChildDetailsRepository>(b"not json").is_err());
  }
}
