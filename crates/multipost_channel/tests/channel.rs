use std::sync::{Arc, Once};

use bytes::Bytes;
use multipost_channel::{
    endpoint_url, ByteStream, ChannelError, ChannelSettings, ReqwestTransport, StreamTransport,
    UploadChannel,
};
use multipost_core::{DelayState, JobEvent, JobKind, SiteFailure};
use pretty_assertions::assert_eq;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(channel_logging::initialize_for_tests);
}

fn drain(channel: &UploadChannel) -> Vec<JobEvent> {
    let mut events = Vec::new();
    while let Some(event) = channel.recv() {
        events.push(event);
    }
    events
}

async fn serve_stream(body: &str, route: &str, job_id: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("id", job_id))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/event-stream"),
        )
        .mount(&server)
        .await;
    server
}

#[test]
fn endpoints_differ_by_kind() {
    let base = Url::parse("https://multipost.example/").unwrap();

    let single = endpoint_url(&base, JobKind::Single, 12).unwrap();
    assert_eq!(
        single.as_str(),
        "https://multipost.example/upload/art/saved?id=12"
    );

    let group = endpoint_url(&base, JobKind::Group, 7).unwrap();
    assert_eq!(
        group.as_str(),
        "https://multipost.example/upload/group/post?id=7"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn single_job_stream_decodes_in_order() {
    init_logging();
    let body = concat!(
        "event: count\ndata: 2\n\n",
        "event: upload\ndata: {\"link\": \"https://a.example/1\", \"name\": \"A - artist\"}\n\n",
        "event: httperror\ndata: {\"site\": \"B\", \"account\": \"artist\", \"code\": 404}\n\n",
        "event: done\ndata: completed\n\n",
    );
    let server = serve_stream(body, "/upload/art/saved", "31").await;
    let base = Url::parse(&server.uri()).unwrap();

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let channel = UploadChannel::open(transport, &base, JobKind::Single, 31).unwrap();
    let events = drain(&channel);

    assert_eq!(events.len(), 4);
    assert_eq!(events[0], JobEvent::Count(2));
    assert!(matches!(events[1], JobEvent::Upload(_)));
    assert_eq!(
        events[2],
        JobEvent::Failed(SiteFailure::HttpError {
            account: "artist".to_string(),
            site: "B".to_string(),
            status: 404,
        })
    );
    assert_eq!(events[3], JobEvent::Done);
}

#[tokio::test(flavor = "multi_thread")]
async fn group_job_stream_decodes_delays_and_groupdone() {
    init_logging();
    let body = concat!(
        "event: count\ndata: 2\n\n",
        "event: delay\ndata: start\n\n",
        "event: delay\ndata: end\n\n",
        "event: groupdone\ndata: done\n\n",
        "event: groupdone\ndata: done\n\n",
        "event: done\ndata: done\n\n",
    );
    let server = serve_stream(body, "/upload/group/post", "8").await;
    let base = Url::parse(&server.uri()).unwrap();

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let channel = UploadChannel::open(transport, &base, JobKind::Group, 8).unwrap();

    assert_eq!(
        drain(&channel),
        vec![
            JobEvent::Count(2),
            JobEvent::Delay(DelayState::Start),
            JobEvent::Delay(DelayState::Stop),
            JobEvent::GroupDone,
            JobEvent::GroupDone,
            JobEvent::Done,
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn nothing_is_delivered_after_done() {
    init_logging();
    let body = concat!(
        "event: count\ndata: 1\n\n",
        "event: done\ndata: done\n\n",
        "event: upload\ndata: {\"link\": \"https://late.example/\", \"name\": \"late\"}\n\n",
    );
    let server = serve_stream(body, "/upload/art/saved", "5").await;
    let base = Url::parse(&server.uri()).unwrap();

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let channel = UploadChannel::open(transport, &base, JobKind::Single, 5).unwrap();

    assert_eq!(drain(&channel), vec![JobEvent::Count(1), JobEvent::Done]);
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_channel_surfaces_one_transport_failure() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/upload/art/saved"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let base = Url::parse(&server.uri()).unwrap();

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let channel = UploadChannel::open(transport, &base, JobKind::Single, 2).unwrap();

    assert_eq!(
        drain(&channel),
        vec![JobEvent::Failed(SiteFailure::Transport), JobEvent::Done]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn pushed_error_event_goes_terminal() {
    init_logging();
    let body = concat!(
        "event: count\ndata: 2\n\n",
        "event: error\ndata: error\n\n",
        "event: groupdone\ndata: done\n\n",
    );
    let server = serve_stream(body, "/upload/group/post", "19").await;
    let base = Url::parse(&server.uri()).unwrap();

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let channel = UploadChannel::open(transport, &base, JobKind::Group, 19).unwrap();

    // The error ends the stream; the groupdone behind it is never seen.
    assert_eq!(
        drain(&channel),
        vec![
            JobEvent::Count(2),
            JobEvent::Failed(SiteFailure::Transport),
            JobEvent::Done,
        ]
    );
}

struct DroppingTransport;

#[async_trait::async_trait]
impl StreamTransport for DroppingTransport {
    async fn open(&self, _url: &Url) -> Result<ByteStream, ChannelError> {
        let chunks: Vec<Result<Bytes, ChannelError>> = vec![
            Ok(Bytes::from_static(b"event: count\ndata: 3\n\n")),
            Err(ChannelError::Read("connection reset".to_string())),
        ];
        Ok(Box::pin(futures_util::stream::iter(chunks)))
    }
}

#[test]
fn mid_stream_read_error_goes_terminal() {
    init_logging();
    let base = Url::parse("https://multipost.example/").unwrap();
    let channel =
        UploadChannel::open(Arc::new(DroppingTransport), &base, JobKind::Single, 1).unwrap();

    assert_eq!(
        drain(&channel),
        vec![
            JobEvent::Count(3),
            JobEvent::Failed(SiteFailure::Transport),
            JobEvent::Done,
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn close_is_idempotent() {
    init_logging();
    let body = "event: count\ndata: 1\n\nevent: done\ndata: done\n\n";
    let server = serve_stream(body, "/upload/art/saved", "4").await;
    let base = Url::parse(&server.uri()).unwrap();

    let transport = Arc::new(ReqwestTransport::new(ChannelSettings::default()));
    let mut channel = UploadChannel::open(transport, &base, JobKind::Single, 4).unwrap();

    channel.close();
    channel.close();
    channel.close();
}
