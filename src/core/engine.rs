use crate::adapters::output::RecordWriter;
use crate::core::extractor::extract_statistics;
use crate::domain::model::{DivergenceRecord, TaxonPairRequest};
use crate::domain::ports::PageFetcher;
use crate::utils::error::Result;
use std::io::Write;
use std::time::Duration;

/// Drives one run: fetch, extract and emit each pair strictly in order.
pub struct RetrievalEngine<F: PageFetcher> {
    fetcher: F,
    endpoint: String,
    sleep: Duration,
}

impl<F: PageFetcher> RetrievalEngine<F> {
    pub fn new(fetcher: F, endpoint: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            sleep: Duration::ZERO,
        }
    }

    pub fn with_sleep(mut self, sleep: Duration) -> Self {
        self.sleep = sleep;
        self
    }

    pub async fn retrieve(&self, pair: &TaxonPairRequest) -> Result<DivergenceRecord> {
        let url = pair.query_url(&self.endpoint);
        let html = self.fetcher.fetch(&url).await?;
        Ok(extract_statistics(&html, &pair.taxon_a, &pair.taxon_b))
    }

    /// Returns the number of records written. The first failure aborts the
    /// run; rows already written stay flushed.
    pub async fn run<I, W>(&self, pairs: I, output: &mut RecordWriter<W>, header: bool) -> Result<usize>
    where
        I: IntoIterator<Item = Result<TaxonPairRequest>>,
        W: Write,
    {
        if header {
            output.write_header()?;
        }

        let mut pairs = pairs.into_iter().peekable();
        let mut written = 0;

        while let Some(pair) = pairs.next() {
            let pair = pair?;
            let record = self.retrieve(&pair).await?;
            output.write_record(&record)?;
            written += 1;

            if !self.sleep.is_zero() && pairs.peek().is_some() {
                tracing::debug!("Sleeping {:?} before next request", self.sleep);
                tokio::time::sleep(self.sleep).await;
            }
        }

        tracing::info!("Retrieved {} divergence records", written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RetrieverError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct MockFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| RetrieverError::HttpStatusError {
                    url: url.to_string(),
                    status: 503,
                })
        }
    }

    const ENDPOINT: &str = "http://timetree.test/index.php";

    fn url(a: &str, b: &str) -> String {
        format!("{}?taxon_a={}&taxon_b={}&submit=Search", ENDPOINT, a, b)
    }

    fn output_lines(output: &RecordWriter<Vec<u8>>) -> Vec<String> {
        String::from_utf8(output.get_ref().clone())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_batch_with_header_in_input_order() {
        let human_chimp = url("Homo+sapiens", "Pan+troglodytes");
        let mouse_rat = url("Mus+musculus", "Rattus+norvegicus");
        let fetcher = MockFetcher::new(&[
            (human_chimp.as_str(), "<tr><td>Mean:</td><td>6.4 Mya</td></tr>"),
            (mouse_rat.as_str(), "<tr><td>Expert Result:</td><td>12.0 Mya</td></tr>"),
        ]);
        let engine = RetrievalEngine::new(fetcher, ENDPOINT);
        let pairs = vec![
            Ok(TaxonPairRequest::new("Homo sapiens", "Pan troglodytes")),
            Ok(TaxonPairRequest::new("Mus_musculus", "Rattus_norvegicus")),
        ];

        let mut output = RecordWriter::new(Vec::new());
        let written = engine.run(pairs, &mut output, true).await.unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            output_lines(&output),
            vec![
                "taxon_a\ttaxon_b\tmean\tmedian\texpert",
                "Homo_sapiens\tPan_troglodytes\t6.4\t-\t-",
                "Mus_musculus\tRattus_norvegicus\t-\t-\t12.0",
            ]
        );
        assert_eq!(
            *engine.fetcher.requested.lock().unwrap(),
            vec![human_chimp, mouse_rat]
        );
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_after_flushed_rows() {
        let ok = url("a", "b");
        let fetcher = MockFetcher::new(&[(ok.as_str(), "<tr><td>Median:</td><td>3.3 Mya</td></tr>")]);
        let engine = RetrievalEngine::new(fetcher, ENDPOINT);
        let pairs = vec![
            Ok(TaxonPairRequest::new("a", "b")),
            Ok(TaxonPairRequest::new("missing", "pair")),
            Ok(TaxonPairRequest::new("a", "b")),
        ];

        let mut output = RecordWriter::new(Vec::new());
        let err = engine.run(pairs, &mut output, false).await.unwrap_err();

        assert!(matches!(err, RetrieverError::HttpStatusError { .. }));
        assert_eq!(output_lines(&output), vec!["a\tb\t-\t3.3\t-"]);
        assert_eq!(engine.fetcher.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_input_error_propagates() {
        let engine = RetrievalEngine::new(MockFetcher::new(&[]), ENDPOINT);
        let pairs = vec![Err(RetrieverError::usage("bad input"))];

        let mut output = RecordWriter::new(Vec::new());
        let err = engine.run(pairs, &mut output, false).await.unwrap_err();

        assert!(err.is_usage());
        assert!(output.get_ref().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_only_between_requests() {
        let page = "<tr><td>Mean:</td><td>1.0 Mya</td></tr>";
        let first = url("a", "b");
        let second = url("c", "d");
        let fetcher = MockFetcher::new(&[(first.as_str(), page), (second.as_str(), page)]);
        let engine = RetrievalEngine::new(fetcher, ENDPOINT).with_sleep(Duration::from_secs(5));
        let pairs = vec![
            Ok(TaxonPairRequest::new("a", "b")),
            Ok(TaxonPairRequest::new("c", "d")),
        ];

        let start = tokio::time::Instant::now();
        let mut output = RecordWriter::new(Vec::new());
        engine.run(pairs, &mut output, false).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(5));
        assert!(elapsed < Duration::from_secs(10));
        assert_eq!(output_lines(&output).len(), 2);
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_rows_flushed_before_sleep_elapses() {
        let page = "<tr><td>Mean:</td><td>1.0 Mya</td></tr>";
        let first = url("a", "b");
        let second = url("c", "d");
        let fetcher = MockFetcher::new(&[(first.as_str(), page), (second.as_str(), page)]);
        let engine = RetrievalEngine::new(fetcher, ENDPOINT).with_sleep(Duration::from_secs(10));
        let pairs = vec![
            Ok(TaxonPairRequest::new("a", "b")),
            Ok(TaxonPairRequest::new("c", "d")),
        ];
        let buffer = SharedBuffer::default();
        let task_buffer = buffer.clone();

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async move {
                let run = tokio::task::spawn_local(async move {
                    let mut output = RecordWriter::new(task_buffer);
                    engine.run(pairs, &mut output, true).await
                });

                tokio::time::sleep(Duration::from_secs(5)).await;
                assert_eq!(
                    buffer.contents(),
                    "taxon_a\ttaxon_b\tmean\tmedian\texpert\na\tb\t1.0\t-\t-\n"
                );

                assert_eq!(run.await.unwrap().unwrap(), 2);
                assert_eq!(
                    buffer.contents(),
                    "taxon_a\ttaxon_b\tmean\tmedian\texpert\na\tb\t1.0\t-\t-\nc\td\t1.0\t-\t-\n"
                );
            })
            .await;
    }

    #[tokio::test]
    async fn test_retrieve_single_pair() {
        let target = url("Homo+sapiens", "Gallus+gallus");
        let fetcher = MockFetcher::new(&[(target.as_str(), "<p>no table</p>")]);
        let engine = RetrievalEngine::new(fetcher, ENDPOINT);

        let record = engine
            .retrieve(&TaxonPairRequest::new("Homo sapiens", "Gallus gallus"))
            .await
            .unwrap();

        assert_eq!(record.to_tsv(), "Homo_sapiens\tGallus_gallus\t-\t-\t-");
    }
}
