use chrono::{DateTime, Utc};

use crate::constants::RUN_ID_SUFFIX_LEN;

/// `<prefix>-YYYYMMDD-HHMMSS-<hex>`, e.g. `inv-20260118-093000-3f9a1c`.
pub fn generate_run_id(prefix: &str, at: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        prefix,
        at.format("%Y%m%d-%H%M%S"),
        &suffix[..RUN_ID_SUFFIX_LEN]
    )
}
