use std::path::PathBuf;

use url::Url;

use crate::assemble::{AssemblyPaths, AudioConverter, MediaAssembler, Muxer};
use crate::combine::{combine, Combined};
use crate::download::segment::{normalize_base_url, StreamKind};
use crate::download::sequence::{SequentialDownloader, StreamSummary};
use crate::download::Transport;
use crate::error::Result;
use crate::options::Layout;
use crate::prompt::BaseUrlSource;

#[derive(Debug)]
pub struct RunReport {
    pub video: StreamSummary,
    pub audio: StreamSummary,
    pub combined_video: Combined,
    pub combined_audio: Combined,
    pub output: PathBuf,
}

/// One full run: download video, download audio, combine both, assemble.
/// The first failure ends the run.
pub struct Pipeline<'a, T: ?Sized, C, M> {
    transport: &'a T,
    assembler: &'a MediaAssembler<C, M>,
    layout: &'a Layout,
}

impl<'a, T, C, M> Pipeline<'a, T, C, M>
where
    T: Transport + ?Sized,
    C: AudioConverter,
    M: Muxer,
{
    pub fn new(transport: &'a T, assembler: &'a MediaAssembler<C, M>, layout: &'a Layout) -> Self {
        Self {
            transport,
            assembler,
            layout,
        }
    }

    fn ask<S: BaseUrlSource>(input: &mut S, kind: StreamKind) -> Result<Url> {
        let raw = input.base_url(kind)?;
        normalize_base_url(kind, &raw)
    }

    async fn download(&self, kind: StreamKind, base: &Url) -> Result<StreamSummary> {
        let folder = self.layout.segment_dir(kind);
        SequentialDownloader::new(self.transport, kind, base, &folder)
            .download()
            .await
    }

    pub async fn run<S: BaseUrlSource>(&self, input: &mut S) -> Result<RunReport> {
        let video_base = Self::ask(input, StreamKind::Video)?;
        self.layout.create()?;
        let video = self.download(StreamKind::Video, &video_base).await?;

        let audio_base = Self::ask(input, StreamKind::Audio)?;
        let audio = self.download(StreamKind::Audio, &audio_base).await?;

        let combined_video = combine(
            StreamKind::Video,
            &self.layout.segment_dir(StreamKind::Video),
            &self.layout.combined(StreamKind::Video),
        )?;
        let combined_audio = combine(
            StreamKind::Audio,
            &self.layout.segment_dir(StreamKind::Audio),
            &self.layout.combined(StreamKind::Audio),
        )?;

        tracing::info!(
            "Assembling files in {}, do not close the window",
            self.layout.output_dir().display()
        );
        let temp_audio = self.layout.temp_audio();
        let final_output = self.layout.final_output();
        let output = self.assembler.assemble(&AssemblyPaths {
            video: &combined_video.path,
            audio: &combined_audio.path,
            temp_audio: &temp_audio,
            output: &final_output,
        })?;

        Ok(RunReport {
            video,
            audio,
            combined_video,
            combined_audio,
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::assemble::tests::{FakeConverter, FakeMuxer};
    use crate::download::sequence::tests::{segment_body, ScriptedTransport};
    use crate::download::DownloadClient;
    use crate::error::Error;

    struct ScriptedInput {
        answers: VecDeque<String>,
        asked: Vec<StreamKind>,
    }

    impl ScriptedInput {
        fn new<A: AsRef<str>>(answers: &[A]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.as_ref().to_string()).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl BaseUrlSource for ScriptedInput {
        fn base_url(&mut self, kind: StreamKind) -> Result<String> {
            self.asked.push(kind);
            Ok(self.answers.pop_front().unwrap_or_default())
        }
    }

    async fn serve(server: &MockServer, route: &str, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn three_segment_server() -> MockServer {
        let server = MockServer::start().await;
        for index in 0..3 {
            serve(&server, &format!("/video/media_{index}.ts"), vec![b'v'; 100 + index]).await;
            serve(&server, &format!("/audio/media_{index}.aac"), vec![b'a'; 10 + index]).await;
        }
        server
    }

    #[tokio::test]
    async fn downloads_combines_and_assembles_both_streams() {
        let server = three_segment_server().await;
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let client = DownloadClient::new().unwrap();
        let assembler = MediaAssembler::new(FakeConverter::default(), FakeMuxer::default());
        let mut input = ScriptedInput::new(&[
            format!("{}/video", server.uri()),
            format!("{}/audio/", server.uri()),
        ]);

        let report = Pipeline::new(&client, &assembler, &layout)
            .run(&mut input)
            .await
            .unwrap();

        assert_eq!(input.asked, vec![StreamKind::Video, StreamKind::Audio]);
        assert_eq!(report.video.segments, 3);
        assert_eq!(report.audio.segments, 3);

        let video_len = std::fs::metadata(layout.combined(StreamKind::Video)).unwrap().len();
        let audio_len = std::fs::metadata(layout.combined(StreamKind::Audio)).unwrap().len();
        assert_eq!(video_len, 100 + 101 + 102);
        assert_eq!(audio_len, 10 + 11 + 12);

        assert_eq!(
            *assembler.muxer.calls.borrow(),
            vec![(
                layout.combined(StreamKind::Video),
                layout.temp_audio(),
                layout.final_output()
            )]
        );
        assert_eq!(
            *assembler.converter.calls.borrow(),
            vec![(layout.combined(StreamKind::Audio), layout.temp_audio())]
        );
        assert_eq!(report.output, layout.final_output());
        assert!(layout.final_output().exists());
        assert!(!layout.temp_audio().exists());
    }

    #[tokio::test]
    async fn failed_assembly_still_removes_temp_audio() {
        let server = three_segment_server().await;
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let client = DownloadClient::new().unwrap();
        let muxer = FakeMuxer {
            fail: true,
            ..Default::default()
        };
        let assembler = MediaAssembler::new(FakeConverter::default(), muxer);
        let mut input = ScriptedInput::new(&[
            format!("{}/video/", server.uri()),
            format!("{}/audio/", server.uri()),
        ]);

        let err = Pipeline::new(&client, &assembler, &layout)
            .run(&mut input)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Assembly { .. }));
        assert_eq!(assembler.muxer.calls.borrow().len(), 1);
        assert!(!layout.temp_audio().exists());
        assert!(!layout.final_output().exists());
    }

    #[tokio::test]
    async fn blank_video_url_stops_before_anything_happens() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let transport = ScriptedTransport::new(3);
        let assembler = MediaAssembler::new(FakeConverter::default(), FakeMuxer::default());
        let mut input = ScriptedInput::new(&["   ", "http://audio.test/"]);

        let err = Pipeline::new(&transport, &assembler, &layout)
            .run(&mut input)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BlankInput { kind: StreamKind::Video }));
        assert_eq!(input.asked, vec![StreamKind::Video]);
        assert!(transport.requested().is_empty());
        assert!(!layout.segment_dir(StreamKind::Video).exists());
    }

    #[tokio::test]
    async fn blank_audio_url_stops_after_video() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let transport = ScriptedTransport::new(2);
        let assembler = MediaAssembler::new(FakeConverter::default(), FakeMuxer::default());
        let mut input = ScriptedInput::new(&["http://video.test/", ""]);

        let err = Pipeline::new(&transport, &assembler, &layout)
            .run(&mut input)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::BlankInput { kind: StreamKind::Audio }));
        assert_eq!(transport.requested(), vec![0, 1, 2]);
        assert!(assembler.muxer.calls.borrow().is_empty());
        assert!(!layout.combined(StreamKind::Video).exists());
    }

    #[tokio::test]
    async fn video_fetch_error_halts_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        let transport = ScriptedTransport::failing_at(5, 1);
        let assembler = MediaAssembler::new(FakeConverter::default(), FakeMuxer::default());
        let mut input = ScriptedInput::new(&["http://video.test/", "http://audio.test/"]);

        let err = Pipeline::new(&transport, &assembler, &layout)
            .run(&mut input)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Fetch { .. }));
        assert_eq!(input.asked, vec![StreamKind::Video]);
        let stored = std::fs::read(layout.segment_dir(StreamKind::Video).join("0.ts")).unwrap();
        assert_eq!(stored, segment_body(0));
        assert!(!layout.segment_dir(StreamKind::Video).join("1.ts").exists());
        assert!(assembler.converter.calls.borrow().is_empty());
        assert!(!layout.final_output().exists());
    }
}
