//! Filter stage shared by every derived view.

use crate::dataset::Dataset;
use crate::models::{FilterSelection, LaunchRecord};

/// Select the records inside the payload interval and, for a concrete
/// site selector, at that site. The result may be empty.
pub fn filter_records<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> Vec<&'a LaunchRecord> {
    dataset
        .records()
        .iter()
        .filter(|r| selection.payload.contains(r.payload_mass))
        .filter(|r| selection.site.matches(&r.launch_site))
        .collect()
}
