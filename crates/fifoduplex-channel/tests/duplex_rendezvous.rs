//! Full duplex exchange between two channel instances standing in for two
//! processes sharing a logical name.

#![cfg(unix)]

use std::path::{Path, PathBuf};

use fifoduplex_channel::{ChannelConfig, ChannelError, ChannelId, ChannelRegistry, DuplexFifo, WriteOutcome};
use fifoduplex_frame::FrameBuffer;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "fifoduplex-it-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn channel_in(dir: &Path, name: &str, registry: &ChannelRegistry) -> DuplexFifo {
    let config = ChannelConfig {
        base_dir: dir.to_path_buf(),
        ..ChannelConfig::default()
    };
    DuplexFifo::with_config(name, registry.assign(), config)
}

/// Drain `channel` into `framer` until one whole payload decodes.
fn recv_one(channel: &mut DuplexFifo, framer: &mut FrameBuffer) -> Vec<u8> {
    loop {
        if let Some(payload) = framer.next_frame().expect("frame should decode") {
            return payload.to_vec();
        }
        let raw = channel.read().expect("read should not error");
        framer.push(&raw);
    }
}

#[test]
fn rendezvous_requires_both_creations() {
    let dir = temp_dir("rendezvous");
    let registry = ChannelRegistry::new();

    // Side A arrives first: its create succeeds, its open cannot until the
    // peer has created (and started reading) the other half.
    let mut side_a = channel_in(&dir, "pair", &registry);
    side_a.create_server_endpoint().expect("A creates server fifo");
    let err = side_a.open_client_endpoint().unwrap_err();
    assert!(matches!(err, ChannelError::NotFound { .. }));
    assert!(!side_a.is_writable());

    // Side B arrives: creates its half, then finds A's half already there.
    let mut side_b = channel_in(&dir, "pair", &registry);
    side_b.create_client_endpoint().expect("B creates client fifo");
    side_b.open_server_endpoint().expect("B opens A's fifo");

    // A retries its open side and the duplex completes.
    side_a.open_client_endpoint().expect("A opens B's fifo on retry");
    assert!(side_a.is_readable() && side_a.is_writable());
    assert!(side_b.is_readable() && side_b.is_writable());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn duplex_exchange_in_both_directions() {
    let dir = temp_dir("exchange");
    let registry = ChannelRegistry::new();

    let mut side_a = channel_in(&dir, "chat", &registry);
    let mut side_b = channel_in(&dir, "chat", &registry);
    side_a.create_server_endpoint().unwrap();
    side_b.create_client_endpoint().unwrap();
    side_b.open_server_endpoint().unwrap();
    side_a.open_client_endpoint().unwrap();

    let mut framer_a = FrameBuffer::new();
    let mut framer_b = FrameBuffer::new();

    assert_eq!(side_a.write(b"hello from A").unwrap(), WriteOutcome::Flushed);
    assert_eq!(recv_one(&mut side_b, &mut framer_b), b"hello from A");

    assert_eq!(side_b.write(b"hello from B").unwrap(), WriteOutcome::Flushed);
    assert_eq!(recv_one(&mut side_a, &mut framer_a), b"hello from B");

    // Empty payloads frame and decode like any other.
    assert_eq!(side_a.write(b"").unwrap(), WriteOutcome::Flushed);
    assert_eq!(recv_one(&mut side_b, &mut framer_b), b"");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn coalesced_writes_decode_in_order_from_one_read() {
    let dir = temp_dir("coalesce");
    let registry = ChannelRegistry::new();

    let mut reader = channel_in(&dir, "burst", &registry);
    reader.create_server_endpoint().unwrap();
    let mut writer = channel_in(&dir, "burst", &registry);
    writer.open_server_endpoint().unwrap();

    assert_eq!(writer.write(b"AB").unwrap(), WriteOutcome::Flushed);
    assert_eq!(writer.write(b"CDE").unwrap(), WriteOutcome::Flushed);

    // Both frames sit in the kernel buffer; one read sees them both.
    let raw = reader.read().unwrap();
    assert_eq!(raw.len(), (4 + 2) + (4 + 3));

    let mut framer = FrameBuffer::new();
    framer.push(&raw);
    assert_eq!(framer.next_frame().unwrap().unwrap().as_ref(), b"AB");
    assert_eq!(framer.next_frame().unwrap().unwrap().as_ref(), b"CDE");
    assert!(framer.next_frame().unwrap().is_none());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn raw_read_contract_may_fragment_frames() {
    let dir = temp_dir("fragment");
    let registry = ChannelRegistry::new();

    let mut reader = channel_in(&dir, "frag", &registry);
    reader.create_server_endpoint().unwrap();
    let mut writer = channel_in(&dir, "frag", &registry);
    writer.open_server_endpoint().unwrap();

    // The channel's read() hands back raw bytes and promises nothing about
    // frame alignment; only the framer recovers boundaries. Simulate a
    // fragmented arrival by pushing the raw run into the framer in slices.
    writer.write(b"split-me").unwrap();
    let raw = reader.read().unwrap();

    let mut framer = FrameBuffer::new();
    let mid = raw.len() / 2;
    framer.push(&raw[..mid]);
    assert!(framer.next_frame().unwrap().is_none());
    framer.push(&raw[mid..]);
    assert_eq!(framer.next_frame().unwrap().unwrap().as_ref(), b"split-me");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn registry_ids_are_diagnostic_only() {
    let dir = temp_dir("ids");
    let registry = ChannelRegistry::new();

    let side_a = channel_in(&dir, "pair", &registry);
    let side_b = channel_in(&dir, "pair", &registry);

    assert_eq!(side_a.id(), ChannelId::new(0));
    assert_eq!(side_b.id(), ChannelId::new(1));
    assert_eq!(side_a.name(), side_b.name());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn peer_teardown_leaves_channel_usable_for_drained_data() {
    let dir = temp_dir("peer-close");
    let registry = ChannelRegistry::new();

    let mut reader = channel_in(&dir, "late", &registry);
    reader.create_server_endpoint().unwrap();
    let mut writer = channel_in(&dir, "late", &registry);
    writer.open_server_endpoint().unwrap();

    writer.write(b"parting gift").unwrap();
    writer.close();

    // Buffered bytes survive the writer's close; afterwards reads go dry.
    let raw = reader.read().unwrap();
    let mut framer = FrameBuffer::new();
    framer.push(&raw);
    assert_eq!(framer.next_frame().unwrap().unwrap().as_ref(), b"parting gift");

    let raw = reader.read().unwrap();
    assert!(raw.is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}
