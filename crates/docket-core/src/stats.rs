//! The aggregation view over the case ledger.
//!
//! Always derived from a full scan; nothing here is stored or cached.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::case::{Case, CaseStatus, CaseType, Priority};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
  #[serde(rename = "type")]
  pub case_type: CaseType,
  pub count:     usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
  pub priority: Priority,
  pub count:    usize,
}

/// Headline counters plus group-by breakdowns.
///
/// Breakdowns list only values present in the data, in enum declaration
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseStats {
  pub total_cases:       usize,
  pub open_cases:        usize,
  pub in_progress_cases: usize,
  pub closed_cases:      usize,
  pub cases_by_type:     Vec<TypeCount>,
  pub cases_by_priority: Vec<PriorityCount>,
}

impl CaseStats {
  pub fn tally<'a>(cases: impl IntoIterator<Item = &'a Case>) -> Self {
    let mut stats = Self::default();
    let mut by_type = BTreeMap::<CaseType, usize>::new();
    let mut by_priority = BTreeMap::<Priority, usize>::new();

    for case in cases {
      stats.total_cases += 1;
      match case.status {
        CaseStatus::Open => stats.open_cases += 1,
        CaseStatus::InProgress => stats.in_progress_cases += 1,
        CaseStatus::Closed => stats.closed_cases += 1,
        _ => {}
      }
      *by_type.entry(case.case_type).or_default() += 1;
      *by_priority.entry(case.priority).or_default() += 1;
    }

    stats.cases_by_type = by_type
      .into_iter()
      .map(|(case_type, count)| TypeCount { case_type, count })
      .collect();
    stats.cases_by_priority = by_priority
      .into_iter()
      .map(|(priority, count)| PriorityCount { priority, count })
      .collect();
    stats
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{case::NewCase, reference::Ref};

  fn case(case_type: CaseType, status: CaseStatus, priority: Priority) -> Case {
    NewCase {
      case_number: Uuid::new_v4().to_string(),
      title: "T".into(),
      description: "D".into(),
      client: Some(Uuid::new_v4().to_string()),
      case_type: Some(case_type.to_string()),
      status: Some(status.to_string()),
      priority: Some(priority.to_string()),
      ..NewCase::default()
    }
    .into_case(Ref::new(Uuid::new_v4()), Utc::now())
    .unwrap()
  }

  #[test]
  fn empty_ledger() {
    let stats = CaseStats::tally(std::iter::empty());
    assert_eq!(stats, CaseStats::default());
  }

  #[test]
  fn counts_headlines_and_breakdowns() {
    let cases = [
      case(CaseType::Tax, CaseStatus::Open, Priority::High),
      case(CaseType::Civil, CaseStatus::Open, Priority::High),
      case(CaseType::Civil, CaseStatus::InProgress, Priority::Low),
      case(CaseType::Civil, CaseStatus::Won, Priority::Urgent),
      case(CaseType::Family, CaseStatus::Closed, Priority::High),
    ];
    let stats = CaseStats::tally(&cases);

    assert_eq!(stats.total_cases, 5);
    assert_eq!(stats.open_cases, 2);
    assert_eq!(stats.in_progress_cases, 1);
    assert_eq!(stats.closed_cases, 1);
    assert_eq!(
      stats.cases_by_type,
      vec![
        TypeCount { case_type: CaseType::Civil, count: 3 },
        TypeCount { case_type: CaseType::Family, count: 1 },
        TypeCount { case_type: CaseType::Tax, count: 1 },
      ]
    );
    assert_eq!(
      stats.cases_by_priority,
      vec![
        PriorityCount { priority: Priority::Low, count: 1 },
        PriorityCount { priority: Priority::High, count: 3 },
        PriorityCount { priority: Priority::Urgent, count: 1 },
      ]
    );
  }

  #[test]
  fn wire_shape() {
    let stats = CaseStats::tally(&[case(CaseType::RealEstate, CaseStatus::Open, Priority::Medium)]);
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["totalCases"], 1);
    assert_eq!(json["casesByType"][0]["type"], "Real Estate");
    assert_eq!(json["casesByPriority"][0]["priority"], "Medium");
  }
}
