//! File-level tests for the `.ge` container: naming, atomic output, the
//! chunk-boundary scenarios at the real 4 MiB chunk size, and the memory
//! bound on inputs much larger than one chunk.

use genf_crypto::format::{read_frame_len, HEADER_SIZE};
use genf_crypto::output::TEMP_SUFFIX;
use genf_crypto::{
    chunk_nonce, decrypt, encrypt, DecryptError, EncryptError, Engine, Header, KdfParams,
    Password, CHUNK_SIZE, TAG_SIZE,
};
use std::collections::HashSet;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fast_engine() -> Engine {
    Engine::with_params(
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        },
        CHUNK_SIZE,
    )
}

fn write_test_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write test file");
    path
}

/// Sealed length of every frame in a container file
fn frame_lengths(container: &[u8]) -> Vec<u64> {
    let mut r = Cursor::new(&container[HEADER_SIZE..]);
    let mut lens = Vec::new();
    while let Some(len) = read_frame_len(&mut r, lens.len() as u64).unwrap() {
        r.set_position(r.position() + len);
        lens.push(len);
    }
    lens
}

fn leftover_temp_files(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(TEMP_SUFFIX))
        .collect()
}

/// Deterministic byte source of a fixed length; never materialized in memory
struct PatternReader {
    pos: u64,
    len: u64,
}

impl Read for PatternReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min((self.len - self.pos) as usize);
        for (i, b) in buf[..n].iter_mut().enumerate() {
            let x = self.pos + i as u64;
            *b = (x.wrapping_mul(31) ^ (x >> 11)) as u8;
        }
        self.pos += n as u64;
        Ok(n)
    }
}

/// Sink that only hashes what it is given
struct HashingSink {
    hasher: blake3::Hasher,
    bytes: u64,
}

impl Write for HashingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.hasher.update(buf);
        self.bytes += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Public two-operation surface (real Argon2id parameters) ───────────────────

#[test]
fn empty_file_roundtrip_with_default_parameters() {
    let tmp = TempDir::new().unwrap();
    let src = write_test_file(tmp.path(), "empty.txt", b"");
    let password = Password::from("correct horse battery staple");

    encrypt(&password, &src).expect("encrypt empty file");
    let container = std::fs::read(tmp.path().join("empty.txt.ge")).unwrap();
    assert_eq!(container.len(), 40, "empty input is header only");

    std::fs::remove_file(&src).unwrap();
    decrypt(&password, &tmp.path().join("empty.txt.ge")).expect("decrypt empty container");
    assert_eq!(std::fs::read(&src).unwrap(), b"");
}

#[test]
fn small_file_roundtrip_and_wrong_password_with_default_parameters() {
    let tmp = TempDir::new().unwrap();
    let original = b"the quick brown fox jumps over the lazy dog";
    let src = write_test_file(tmp.path(), "fox.txt", original);
    let container = tmp.path().join("fox.txt.ge");

    encrypt(&Password::from("right"), &src).unwrap();
    std::fs::remove_file(&src).unwrap();

    let err = decrypt(&Password::from("wrong"), &container).unwrap_err();
    assert!(matches!(err, DecryptError::AuthenticationFailed { chunk: 0 }));
    assert!(!src.exists(), "failed decrypt must not produce the output file");
    assert!(leftover_temp_files(tmp.path()).is_empty());

    decrypt(&Password::from("right"), &container).unwrap();
    assert_eq!(std::fs::read(&src).unwrap(), original);
}

// ── Chunk boundaries at 4 MiB ─────────────────────────────────────────────────

#[test]
fn exactly_one_chunk_for_four_mib() {
    let tmp = TempDir::new().unwrap();
    let src = write_test_file(tmp.path(), "four.bin", &vec![0x5Au8; CHUNK_SIZE]);
    let engine = fast_engine();
    let password = Password::from("pw");

    let report = engine.encrypt_file(&password, &src, None).unwrap();
    let container = std::fs::read(&report.output).unwrap();

    assert_eq!(frame_lengths(&container), vec![(CHUNK_SIZE + TAG_SIZE) as u64]);
    assert_eq!(report.summary.chunks, 1);
}

#[test]
fn two_chunks_for_four_mib_plus_one() {
    let tmp = TempDir::new().unwrap();
    let mut data = vec![0x5Au8; CHUNK_SIZE];
    data.push(0xA5);
    let src = write_test_file(tmp.path(), "four-plus.bin", &data);
    let engine = fast_engine();
    let password = Password::from("pw");

    let report = engine.encrypt_file(&password, &src, None).unwrap();
    let container = std::fs::read(&report.output).unwrap();
    assert_eq!(
        frame_lengths(&container),
        vec![(CHUNK_SIZE + TAG_SIZE) as u64, (1 + TAG_SIZE) as u64]
    );

    std::fs::remove_file(&src).unwrap();
    engine.decrypt_file(&password, &report.output, None).unwrap();
    assert_eq!(std::fs::read(&src).unwrap(), data);
}

#[test]
fn chunk_nonces_in_a_container_are_distinct() {
    let engine = Engine::with_params(
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        },
        16,
    );
    let mut container = Vec::new();
    engine
        .encrypt_stream(&Password::from("pw"), &mut Cursor::new(vec![1u8; 16 * 500]), &mut container)
        .unwrap();

    let header = Header::read_from(&mut Cursor::new(&container)).unwrap();
    let n = frame_lengths(&container).len() as u64;
    assert_eq!(n, 500);

    let nonces: HashSet<_> = (0..n).map(|i| chunk_nonce(&header.base_nonce, i)).collect();
    assert_eq!(nonces.len() as u64, n);
}

// ── Bounded memory ────────────────────────────────────────────────────────────

#[test]
fn ten_chunk_stream_uses_one_chunk_buffer() {
    let tmp = TempDir::new().unwrap();
    let engine = fast_engine();
    let password = Password::from("pw");
    let len = 10 * CHUNK_SIZE as u64 + 12345;

    let container_path = tmp.path().join("big.bin.ge");
    let mut expected = blake3::Hasher::new();
    std::io::copy(&mut PatternReader { pos: 0, len }, &mut HashingWriter(&mut expected)).unwrap();

    let enc = {
        let mut file = std::fs::File::create(&container_path).unwrap();
        engine
            .encrypt_stream(&password, &mut PatternReader { pos: 0, len }, &mut file)
            .unwrap()
    };
    assert_eq!(enc.chunks, 11);
    assert_eq!(enc.plaintext_bytes, len);
    assert!(
        enc.peak_buffer <= CHUNK_SIZE + TAG_SIZE,
        "encrypt buffer {} exceeds one chunk",
        enc.peak_buffer
    );

    let mut sink = HashingSink {
        hasher: blake3::Hasher::new(),
        bytes: 0,
    };
    let dec = engine
        .decrypt_stream(
            &password,
            &mut std::fs::File::open(&container_path).unwrap(),
            &mut sink,
        )
        .unwrap();
    assert_eq!(dec.chunks, 11);
    assert!(
        dec.peak_buffer <= CHUNK_SIZE + TAG_SIZE,
        "decrypt buffer {} exceeds one chunk",
        dec.peak_buffer
    );
    assert_eq!(sink.bytes, len);
    assert_eq!(sink.hasher.finalize(), expected.finalize());
}

struct HashingWriter<'a>(&'a mut blake3::Hasher);

impl Write for HashingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ── Failure hygiene ───────────────────────────────────────────────────────────

#[test]
fn missing_source_is_io_error_without_output() {
    let tmp = TempDir::new().unwrap();
    let src = tmp.path().join("does-not-exist.txt");

    let err = fast_engine()
        .encrypt_file(&Password::from("pw"), &src, None)
        .unwrap_err();
    assert!(matches!(err, EncryptError::Io(_)));
    assert!(!tmp.path().join("does-not-exist.txt.ge").exists());
    assert!(leftover_temp_files(tmp.path()).is_empty());
}

#[test]
fn decrypt_requires_container_suffix() {
    let tmp = TempDir::new().unwrap();
    let src = write_test_file(tmp.path(), "plain.txt", b"not a container");

    let err = fast_engine()
        .decrypt_file(&Password::from("pw"), &src, None)
        .unwrap_err();
    assert!(matches!(err, DecryptError::InvalidContainerName(_)));
    assert_eq!(std::fs::read(&src).unwrap(), b"not a container");
}

#[test]
fn tampered_container_leaves_no_partial_plaintext() {
    let tmp = TempDir::new().unwrap();
    let engine = Engine::with_params(
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        },
        64,
    );
    let password = Password::from("pw");
    let src = write_test_file(tmp.path(), "doc.txt", &[9u8; 300]);
    let report = engine.encrypt_file(&password, &src, None).unwrap();
    std::fs::remove_file(&src).unwrap();

    let mut container = std::fs::read(&report.output).unwrap();
    let last = container.len() - 1;
    container[last] ^= 0x01;
    std::fs::write(&report.output, &container).unwrap();

    let err = engine.decrypt_file(&password, &report.output, None).unwrap_err();
    assert!(matches!(err, DecryptError::AuthenticationFailed { chunk: 4 }));
    assert!(!src.exists());
    assert!(leftover_temp_files(tmp.path()).is_empty());
}

#[test]
fn encrypt_overwrites_stale_container() {
    let tmp = TempDir::new().unwrap();
    let src = write_test_file(tmp.path(), "a.txt", b"fresh");
    write_test_file(tmp.path(), "a.txt.ge", b"stale junk");
    let engine = fast_engine();
    let password = Password::from("pw");

    engine.encrypt_file(&password, &src, None).unwrap();
    std::fs::remove_file(&src).unwrap();
    engine
        .decrypt_file(&password, &tmp.path().join("a.txt.ge"), None)
        .unwrap();
    assert_eq!(std::fs::read(&src).unwrap(), b"fresh");
}

#[test]
fn user_file_at_temp_like_name_survives_encrypt() {
    let tmp = TempDir::new().unwrap();
    let src = write_test_file(tmp.path(), "a.txt", b"secret");
    let user_file = write_test_file(tmp.path(), "a.txt.ge.genf-tmp", b"USER DATA");

    fast_engine()
        .encrypt_file(&Password::from("pw"), &src, None)
        .unwrap();

    assert!(tmp.path().join("a.txt.ge").exists());
    assert_eq!(std::fs::read(&user_file).unwrap(), b"USER DATA");
    assert_eq!(leftover_temp_files(tmp.path()), vec![user_file]);
}

#[test]
fn user_file_at_temp_like_name_survives_failed_decrypt() {
    let tmp = TempDir::new().unwrap();
    let engine = fast_engine();
    let password = Password::from("pw");
    let src = write_test_file(tmp.path(), "b.txt", &[5u8; 64]);
    let report = engine.encrypt_file(&password, &src, None).unwrap();
    std::fs::remove_file(&src).unwrap();

    let container = std::fs::read(&report.output).unwrap();
    std::fs::write(&report.output, &container[..container.len() - 10]).unwrap();
    let user_file = write_test_file(tmp.path(), "b.txt.genf-tmp", b"USER DATA");

    let err = engine.decrypt_file(&password, &report.output, None).unwrap_err();
    assert!(err.is_truncation());
    assert!(!src.exists());
    assert_eq!(std::fs::read(&user_file).unwrap(), b"USER DATA");
    assert_eq!(leftover_temp_files(tmp.path()), vec![user_file]);
}

#[test]
fn progress_reports_reach_total() {
    let tmp = TempDir::new().unwrap();
    let engine = Engine::with_params(
        KdfParams {
            mem_cost_kib: 1024,
            time_cost: 1,
            parallelism: 1,
        },
        100,
    );
    let src = write_test_file(tmp.path(), "p.bin", &[3u8; 450]);

    let last = std::sync::Arc::new(std::sync::Mutex::new((0u64, 0u64)));
    let last_clone = last.clone();
    let progress: genf_crypto::ProgressFn = Box::new(move |done, total, _msg| {
        *last_clone.lock().unwrap() = (done, total);
    });

    engine
        .encrypt_file(&Password::from("pw"), &src, Some(&progress))
        .unwrap();
    assert_eq!(*last.lock().unwrap(), (450, 450));
}
