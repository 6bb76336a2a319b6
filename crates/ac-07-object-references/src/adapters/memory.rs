use crate::domain::UploadRequest;
use crate::ports::outbound::UploadStore;
use shared_types::{GoodId, UploadRequestId};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
pub struct InMemoryUploadStore {
    requests: BTreeMap<UploadRequestId, UploadRequest>,
    by_good: HashMap<GoodId, Vec<UploadRequestId>>,
}

impl InMemoryUploadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UploadStore for InMemoryUploadStore {
    fn next_id(&self) -> UploadRequestId {
        UploadRequestId(self.requests.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn get(&self, id: UploadRequestId) -> Option<UploadRequest> {
        self.requests.get(&id).cloned()
    }

    fn put(&mut self, request: UploadRequest) {
        if !self.requests.contains_key(&request.id) {
            self.by_good.entry(request.good_id).or_default().push(request.id);
        }
        self.requests.insert(request.id, request);
    }

    fn for_good(&self, good_id: GoodId) -> Vec<UploadRequest> {
        self.by_good
            .get(&good_id)
            .map(|ids| ids.iter().filter_map(|id| self.get(*id)).collect())
            .unwrap_or_default()
    }
}
