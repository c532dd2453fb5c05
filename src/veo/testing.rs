//! Scripted `VideoService` and operation fixtures shared by the unit tests.

use crate::{
    error::{Result, VeoError},
    models::{
        GenerateVideoResponse, GeneratedSample, GeneratedVideo, Operation, OperationHandle,
        OperationResponse, VideoRequest,
    },
    veo::traits::VideoService,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub fn pending(name: &str) -> Operation {
    Operation {
        name: name.to_string(),
        ..Default::default()
    }
}

pub fn done_without_response(name: &str) -> Operation {
    Operation {
        name: name.to_string(),
        done: Some(true),
        ..Default::default()
    }
}

fn done_with(name: &str, response: GenerateVideoResponse) -> Operation {
    Operation {
        name: name.to_string(),
        done: Some(true),
        error: None,
        response: Some(OperationResponse {
            type_field: None,
            generate_video_response: Some(response),
        }),
    }
}

pub fn done_with_video(name: &str, uri: &str) -> Operation {
    done_with(
        name,
        GenerateVideoResponse {
            generated_samples: vec![GeneratedSample {
                video: Some(GeneratedVideo {
                    uri: Some(uri.to_string()),
                    ..Default::default()
                }),
            }],
            ..Default::default()
        },
    )
}

pub fn done_filtered(name: &str, reasons: &[&str]) -> Operation {
    done_with(
        name,
        GenerateVideoResponse {
            rai_media_filtered_count: Some(reasons.len() as u32),
            rai_media_filtered_reasons: reasons.iter().map(|r| r.to_string()).collect(),
            ..Default::default()
        },
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = ::image::RgbaImage::from_pixel(width, height, ::image::Rgba([200, 30, 30, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ::image::ImageFormat::Png)
        .expect("encode png fixture");
    bytes
}

#[derive(Default)]
pub struct FakeService {
    submits: Mutex<VecDeque<Result<Operation>>>,
    refreshes: Mutex<VecDeque<Result<Operation>>>,
    video: Vec<u8>,
    submit_calls: AtomicU32,
    refresh_calls: AtomicU32,
    download_calls: AtomicU32,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submit(self, operation: Operation) -> Self {
        self.submits.lock().unwrap().push_back(Ok(operation));
        self
    }

    pub fn with_submit_error(self, error: VeoError) -> Self {
        self.submits.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_refresh(self, operation: Operation) -> Self {
        self.refreshes.lock().unwrap().push_back(Ok(operation));
        self
    }

    pub fn with_refresh_error(self, error: VeoError) -> Self {
        self.refreshes.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn with_video(mut self, bytes: Vec<u8>) -> Self {
        self.video = bytes;
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn refresh_calls(&self) -> u32 {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn download_calls(&self) -> u32 {
        self.download_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoService for FakeService {
    async fn submit(&self, _request: &VideoRequest) -> Result<Operation> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(VeoError::Response("no scripted submit".into())))
    }

    async fn refresh(&self, handle: &OperationHandle) -> Result<Operation> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refreshes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(VeoError::Response(format!("no scripted refresh for {handle}"))))
    }

    async fn download(&self, _uri: &str) -> Result<Vec<u8>> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.video.clone())
    }
}
