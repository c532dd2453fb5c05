use crate::{
    error::{Result, VeoError},
    media::VideoArtifact,
    models::{GeneratedVideo, Operation},
    veo::{
        state::{EmptyReason, OperationState},
        traits::VideoService,
    },
};
use base64::Engine as _;

/// Terminal classification of a finished operation. Checks run in order:
/// operation error, missing response, content filter, missing video.
pub fn classify(operation: &Operation) -> OperationState {
    if let Some(error) = &operation.error {
        return OperationState::Failed(error.clone());
    }

    let Some(response) = operation.video_response() else {
        return OperationState::Empty(EmptyReason::NoResponse);
    };

    if let Some(reason) = response.rai_media_filtered_reasons.first() {
        return OperationState::Filtered(reason.clone());
    }

    match response
        .generated_samples
        .first()
        .and_then(|sample| sample.video.clone())
    {
        Some(video) => OperationState::Succeeded(video),
        None => OperationState::Empty(EmptyReason::NoVideo),
    }
}

pub fn into_video(state: OperationState) -> Result<GeneratedVideo> {
    match state {
        OperationState::Succeeded(video) => Ok(video),
        OperationState::Empty(EmptyReason::NoResponse) => Err(VeoError::NoResponse),
        OperationState::Empty(EmptyReason::NoVideo) => Err(VeoError::NoVideo),
        OperationState::Filtered(reason) => Err(VeoError::ContentFiltered(reason)),
        OperationState::Failed(error) => Err(VeoError::OperationFailed {
            code: error.code,
            message: error.message,
        }),
        OperationState::Submitted(handle) | OperationState::Pending(handle) => Err(
            VeoError::Response(format!("operation {handle} has not finished")),
        ),
    }
}

/// Inline bytes win over the URI; only the URI costs a request.
pub async fn fetch<S>(service: &S, video: &GeneratedVideo) -> Result<VideoArtifact>
where
    S: VideoService + ?Sized,
{
    let bytes = if let Some(encoded) = &video.bytes_base64_encoded {
        base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| VeoError::Response(format!("Failed to decode video data: {e}")))?
    } else if let Some(uri) = &video.uri {
        service.download(uri).await?
    } else {
        return Err(VeoError::Response(
            "Generated video has neither inline data nor a URI".into(),
        ));
    };

    if bytes.is_empty() {
        return Err(VeoError::NoVideo);
    }

    Ok(VideoArtifact::new(bytes, video.mime_type.clone()))
}

pub fn success_message(elapsed_secs: u64) -> String {
    format!("Video generated successfully! ({elapsed_secs} seconds)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OperationError;
    use crate::veo::testing::{done_filtered, done_with_video, done_without_response, FakeService};
    use serde_json::json;

    #[test]
    fn test_no_response() {
        let state = classify(&done_without_response("op"));
        assert_eq!(state, OperationState::Empty(EmptyReason::NoResponse));
        assert!(matches!(into_video(state), Err(VeoError::NoResponse)));
    }

    #[test]
    fn test_first_filter_reason_wins() {
        let state = classify(&done_filtered("op", &["violence", "minors"]));
        assert_eq!(state, OperationState::Filtered("violence".into()));

        let err = into_video(state).unwrap_err();
        assert_eq!(err.to_string(), "Video was blocked: violence");
    }

    #[test]
    fn test_empty_sample_list() {
        let operation: Operation = serde_json::from_value(json!({
            "name": "op",
            "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [] } }
        }))
        .unwrap();

        let state = classify(&operation);
        assert_eq!(state, OperationState::Empty(EmptyReason::NoVideo));
        assert!(matches!(into_video(state), Err(VeoError::NoVideo)));
    }

    #[test]
    fn test_operation_error_reported_first() {
        let mut operation = done_filtered("op", &["ignored"]);
        operation.error = Some(OperationError {
            code: 3,
            message: "invalid argument".into(),
        });

        let err = into_video(classify(&operation)).unwrap_err();
        assert!(matches!(err, VeoError::OperationFailed { code: 3, .. }));
    }

    #[test]
    fn test_first_video_selected() {
        let state = classify(&done_with_video("op", "https://files/first"));
        let video = into_video(state).unwrap();
        assert_eq!(video.uri.as_deref(), Some("https://files/first"));
    }

    #[tokio::test]
    async fn test_fetch_inline_video_skips_download() {
        let service = FakeService::new();
        let video = GeneratedVideo {
            uri: Some("https://files/ignored".into()),
            bytes_base64_encoded: Some("AAECAw==".into()),
            mime_type: Some("video/mp4".into()),
        };

        let artifact = fetch(&service, &video).await.unwrap();
        assert_eq!(artifact.bytes, vec![0, 1, 2, 3]);
        assert_eq!(service.download_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_by_uri() {
        let service = FakeService::new().with_video(b"mp4 bytes".to_vec());
        let video = GeneratedVideo {
            uri: Some("https://files/v".into()),
            ..Default::default()
        };

        let artifact = fetch(&service, &video).await.unwrap();
        assert_eq!(artifact.bytes, b"mp4 bytes");
        assert_eq!(artifact.mime_type, "video/mp4");
        assert_eq!(service.download_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_without_location() {
        let service = FakeService::new();
        let result = fetch(&service, &GeneratedVideo::default()).await;
        assert!(matches!(result, Err(VeoError::Response(_))));
    }
}
