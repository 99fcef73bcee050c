// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Classify snapshot rows and tally per-(subject, org) counts in first-seen order
// role: aggregation/summary
// inputs: SnapshotRow iterator (from a snapshot file or a fresh record set)
// outputs: Summary with insertion-ordered AggregateGroup rows
// invariants:
// - Keys are structured (subject, org) pairs compared exactly and case-sensitively
// - Each row bumps exactly one bucket and total
// - Group order is the order keys are first seen
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashMap;

use crate::csvio::SnapshotRow;
use crate::model::{AggregateGroup, Disposition, GroupKey};

#[derive(Debug, Default)]
pub struct Summary {
  groups: Vec<AggregateGroup>,
  index: HashMap<GroupKey, usize>,
}

impl Summary {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&mut self, row: &SnapshotRow) {
    let key = GroupKey {
      subject: row.subject.clone(),
      org: row.org.clone(),
    };
    let disposition = Disposition::classify(row.status, row.merged);

    let idx = match self.index.get(&key) {
      Some(&idx) => idx,
      None => {
        self.groups.push(AggregateGroup::new(&key));
        let idx = self.groups.len() - 1;
        self.index.insert(key, idx);
        idx
      }
    };

    self.groups[idx].bump(disposition);
  }

  pub fn groups(&self) -> &[AggregateGroup] {
    &self.groups
  }

  #[cfg(test)]
  pub fn get(&self, subject: &str, org: &str) -> Option<&AggregateGroup> {
    let key = GroupKey {
      subject: subject.to_string(),
      org: org.to_string(),
    };
    self.index.get(&key).map(|&idx| &self.groups[idx])
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }
}

pub fn aggregate<'a, I>(rows: I) -> Summary
where
  I: IntoIterator<Item = &'a SnapshotRow>,
{
  let mut summary = Summary::new();

  for row in rows {
    summary.record(row);
  }

  summary
}
