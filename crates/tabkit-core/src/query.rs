//! Initial selection from the page address.

use url::Url;

/// Every value of the repeatable query `key`, in address order.
pub fn query_values(address: &Url, key: &str) -> Vec<String> {
    address
        .query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}
