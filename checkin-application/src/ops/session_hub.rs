use std::collections::HashMap;
use std::sync::Arc;

use checkin_domain::SessionId;
use tokio::sync::{Mutex, RwLock};

use crate::ops::ScanSession;

#[derive(Default)]
pub struct ScanSessionHub {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<ScanSession>>>>,
}

impl ScanSessionHub {
    pub async fn insert(&self, session: ScanSession) -> Arc<Mutex<ScanSession>> {
        let id = session.id();
        let handle = Arc::new(Mutex::new(session));
        self.sessions.write().await.insert(id, handle.clone());
        handle
    }

    pub async fn get(&self, id: &SessionId) -> Option<Arc<Mutex<ScanSession>>> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &SessionId) -> Option<Arc<Mutex<ScanSession>>> {
        self.sessions.write().await.remove(id)
    }

    pub async fn snapshot(&self) -> Vec<(SessionId, Arc<Mutex<ScanSession>>)> {
        self.sessions
            .read()
            .await
            .iter()
            .map(|(id, handle)| (*id, handle.clone()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
