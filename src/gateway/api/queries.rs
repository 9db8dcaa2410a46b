use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SequenceQuery<'a> {
    pub site_id: &'a str,
    pub partition_id: &'a str,
    pub invoice_type: &'a str,
}

/// Body of a release call; frees `sequence_number` back to the gap pool.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    pub sequence_number: u64,
    pub site_id: String,
    pub partition_id: String,
    pub reason: String,
}
