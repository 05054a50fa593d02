use multipost_channel::{SseFrame, SseParser};
use pretty_assertions::assert_eq;

fn frame(name: &str, data: &str) -> SseFrame {
    SseFrame {
        name: name.to_string(),
        data: data.to_string(),
    }
}

#[test]
fn parses_a_complete_stream() {
    let mut parser = SseParser::new();
    let frames = parser.push(
        b"event: count\ndata: 3\n\nevent: upload\ndata: {\"link\": \"https://a\", \"name\": \"b\"}\n\n",
    );

    assert_eq!(
        frames,
        vec![
            frame("count", "3"),
            frame("upload", "{\"link\": \"https://a\", \"name\": \"b\"}"),
        ]
    );
}

#[test]
fn reassembles_frames_split_across_chunks() {
    let mut parser = SseParser::new();
    let whole = b"event: count\ndata: 12\n\nevent: done\ndata: completed\n\n";

    // Feed one byte at a time; only complete frames may come out.
    let mut frames = Vec::new();
    for byte in whole.iter() {
        frames.extend(parser.push(std::slice::from_ref(byte)));
    }

    assert_eq!(
        frames,
        vec![frame("count", "12"), frame("done", "completed")]
    );
}

#[test]
fn multiple_data_lines_join_with_newline() {
    let mut parser = SseParser::new();
    let frames = parser.push(b"event: siteerror\ndata: first\ndata: second\n\n");

    assert_eq!(frames, vec![frame("siteerror", "first\nsecond")]);
}

#[test]
fn skips_comments_and_unknown_fields() {
    let mut parser = SseParser::new();
    let frames = parser.push(b": keep-alive\nid: 7\nretry: 1000\nevent: count\ndata: 2\n\n");

    assert_eq!(frames, vec![frame("count", "2")]);
}

#[test]
fn tolerates_crlf_line_endings() {
    let mut parser = SseParser::new();
    let frames = parser.push(b"event: count\r\ndata: 5\r\n\r\n");

    assert_eq!(frames, vec![frame("count", "5")]);
}

#[test]
fn frame_without_name_defaults_to_message() {
    let mut parser = SseParser::new();
    let frames = parser.push(b"data: hello\n\n");

    assert_eq!(frames, vec![frame("message", "hello")]);
}

#[test]
fn blank_line_without_data_dispatches_nothing() {
    let mut parser = SseParser::new();
    let frames = parser.push(b"event: count\n\ndata: 3\n\n");

    // The first blank line resets the pending name; the data-only frame
    // falls back to the default name.
    assert_eq!(frames, vec![frame("message", "3")]);
}

#[test]
fn unterminated_trailing_frame_is_dropped() {
    let mut parser = SseParser::new();
    let frames = parser.push(b"event: count\ndata: 3\n\nevent: done\ndata: comp");

    assert_eq!(frames, vec![frame("count", "3")]);
}

#[test]
fn colon_in_data_is_preserved() {
    let mut parser = SseParser::new();
    let frames = parser.push(b"data: {\"link\": \"https://furaffinity.net/view/1\"}\n\n");

    assert_eq!(
        frames,
        vec![frame("message", "{\"link\": \"https://furaffinity.net/view/1\"}")]
    );
}
