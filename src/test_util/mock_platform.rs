use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::upstream::{EndpointClient, ObjectStore, TransformJobClient, TransformJobDescription};

/// One recorded endpoint invocation, captured for assertions.
#[derive(Debug, Clone)]
pub struct RecordedInvocation {
    pub endpoint_name: String,
    pub payload: Vec<u8>,
    pub content_type: String,
}

/// Scriptable endpoint double.
///
/// Scripted results (pushed with `push`) are consumed first, in order; once
/// the script is exhausted every call succeeds with the fallback response.
pub struct MockEndpoint {
    fallback: Vec<u8>,
    script: Mutex<VecDeque<Result<Vec<u8>>>>,
    calls: Mutex<Vec<RecordedInvocation>>,
}

impl MockEndpoint {
    pub fn returning(response: &[u8]) -> Self {
        Self {
            fallback: response.to_vec(),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, result: Result<Vec<u8>>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<RecordedInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl EndpointClient for MockEndpoint {
    async fn invoke(
        &self,
        endpoint_name: &str,
        payload: &[u8],
        content_type: &str,
    ) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RecordedInvocation {
            endpoint_name: endpoint_name.to_string(),
            payload: payload.to_vec(),
            content_type: content_type.to_string(),
        });

        match self.script.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.fallback.clone()),
        }
    }
}

/// In-memory object store double.
pub struct MockObjectStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
    gets: AtomicUsize,
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(HashMap::new()),
            gets: AtomicUsize::new(0),
        }
    }

    pub fn put(&self, bucket: &str, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| {
                Error::UpstreamInvocationFailed(format!("object {}/{} not found", bucket, key))
            })
    }
}

/// In-memory transform job registry double.
///
/// Scripted results (pushed with `push`) are consumed first, in order; once
/// the script is exhausted lookups fall back to the inserted jobs.
pub struct MockTransformJobs {
    jobs: Mutex<HashMap<String, TransformJobDescription>>,
    script: Mutex<VecDeque<Result<TransformJobDescription>>>,
    lookups: AtomicUsize,
}

impl MockTransformJobs {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            script: Mutex::new(VecDeque::new()),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn insert(&self, name: &str, description: TransformJobDescription) {
        self.jobs.lock().unwrap().insert(name.to_string(), description);
    }

    pub fn push(&self, result: Result<TransformJobDescription>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl Default for MockTransformJobs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransformJobClient for MockTransformJobs {
    async fn describe_job(&self, name: &str) -> Result<TransformJobDescription> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.script.lock().unwrap().pop_front() {
            return result;
        }
        self.jobs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| {
                Error::UpstreamInvocationFailed(format!("transform job {} not found", name))
            })
    }
}
