//! Plain text persistence of score distributions.
//!
//! The format is tab-separated with a fixed header line:
//!
//! ```text
//! #numTerms	entrezId	sampleSize	distribution
//! 1	2200	100000	0.0:0.25,0.5:0.75,1.0:1.0
//! ```
//!
//! The second column holds the object id; its header name is kept as
//! `entrezId` so that existing files remain readable.  The distribution is a
//! comma-separated list of `score:probability` pairs by increasing score.

use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

use itertools::Itertools;

use super::{ObjectScoreDistribution, ScoreDistribution};
use crate::common::io::{open_read_maybe_gz, open_write_maybe_gz};

/// The header line.
pub const HEADER: [&str; 4] = ["#numTerms", "entrezId", "sampleSize", "distribution"];

/// One line of the text file.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Record {
    num_terms: usize,
    object_id: u32,
    sample_size: usize,
    distribution: String,
}

impl Record {
    fn from_object_distribution(
        dist: &ObjectScoreDistribution,
        resolution: Option<usize>,
    ) -> Result<Self, anyhow::Error> {
        Ok(Self {
            num_terms: dist.num_terms(),
            object_id: dist.object_id(),
            sample_size: dist.sample_size(),
            distribution: dist
                .resampled(resolution)?
                .iter()
                .map(|(score, p)| format!("{}:{}", score, p))
                .join(","),
        })
    }

    fn into_object_distribution(self) -> Result<ObjectScoreDistribution, anyhow::Error> {
        let table = self
            .distribution
            .split(',')
            .map(|pair| {
                let (score, p) = pair
                    .split_once(':')
                    .ok_or_else(|| anyhow::anyhow!("invalid score:probability pair {:?}", pair))?;
                Ok((score.parse::<f64>()?, p.parse::<f64>()?))
            })
            .collect::<Result<Vec<_>, anyhow::Error>>()?;
        Ok(ObjectScoreDistribution::new(
            self.object_id,
            self.num_terms,
            self.sample_size,
            table,
        )?)
    }
}

/// Writes score distributions in the text format.
pub struct TextScoreDistributionWriter<W: Write> {
    writer: csv::Writer<W>,
    resolution: Option<usize>,
}

impl TextScoreDistributionWriter<Box<dyn Write>> {
    /// Create file at `path`, gzip-compressed if it ends in `.gz`.
    pub fn create<P: AsRef<Path>>(path: P, resolution: Option<usize>) -> Result<Self, anyhow::Error> {
        Self::new(open_write_maybe_gz(path)?, resolution)
    }
}

impl<W: Write> TextScoreDistributionWriter<W> {
    /// Construct and write the header.
    ///
    /// With `resolution`, each distribution is resampled to `resolution + 1`
    /// points before writing.
    pub fn new(writer: W, resolution: Option<usize>) -> Result<Self, anyhow::Error> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(writer);
        writer.write_record(HEADER)?;
        Ok(Self { writer, resolution })
    }

    /// Write all object distributions of `dist`.
    pub fn write(&mut self, dist: &ScoreDistribution) -> Result<(), anyhow::Error> {
        for object_dist in dist.object_distributions() {
            self.writer
                .serialize(Record::from_object_distribution(object_dist, self.resolution)?)?;
        }
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, anyhow::Error> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("problem flushing score distributions: {}", e.error()))
    }
}

/// Reads score distributions in the text format.
pub struct TextScoreDistributionReader<R: BufRead> {
    reader: csv::Reader<R>,
}

impl TextScoreDistributionReader<Box<dyn BufRead>> {
    /// Open the file at `path`, gzip-compressed if it ends in `.gz`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        Self::new(open_read_maybe_gz(path)?)
    }
}

impl<R: BufRead> TextScoreDistributionReader<R> {
    /// Construct and validate the header.
    pub fn new(reader: R) -> Result<Self, anyhow::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_reader(reader);
        let header = reader.headers()?;
        if header.iter().ne(HEADER.iter().copied()) {
            anyhow::bail!(
                "invalid header, was: {:?}, expected: {:?}",
                header.iter().join("\t"),
                HEADER.join("\t")
            );
        }
        Ok(Self { reader })
    }

    /// Read all distributions, keyed by number of terms.
    pub fn read_all(mut self) -> Result<BTreeMap<usize, ScoreDistribution>, anyhow::Error> {
        let mut result: BTreeMap<usize, ScoreDistribution> = BTreeMap::new();
        for record in self.reader.records() {
            let record: Record = record?.deserialize(None)?;
            let dist = record.into_object_distribution()?;
            let num_terms = dist.num_terms();
            result
                .entry(num_terms)
                .or_insert_with(|| ScoreDistribution {
                    num_terms,
                    object_distributions: BTreeMap::new(),
                })
                .insert(dist)?;
        }
        Ok(result)
    }

    /// Read the distributions for `num_terms` terms.
    ///
    /// # Errors
    ///
    /// If there is no distribution for `num_terms` terms.
    pub fn read_for_term_count(self, num_terms: usize) -> Result<ScoreDistribution, anyhow::Error> {
        self.read_all()?
            .remove(&num_terms)
            .ok_or_else(|| anyhow::anyhow!("distribution not found for term count: {}", num_terms))
    }

    /// Read the distribution for `num_terms` terms and the given object.
    ///
    /// # Errors
    ///
    /// If there is no such distribution.
    pub fn read_for_term_count_and_object(
        self,
        num_terms: usize,
        object_id: u32,
    ) -> Result<ObjectScoreDistribution, anyhow::Error> {
        self.read_for_term_count(num_terms)?
            .object_distributions
            .remove(&object_id)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "distribution not found for term count: {} and object ID: {}",
                    num_terms,
                    object_id
                )
            })
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::{TextScoreDistributionReader, TextScoreDistributionWriter};
    use crate::scoredist::{ObjectScoreDistribution, ScoreDistribution};

    fn distributions() -> Result<Vec<ScoreDistribution>, anyhow::Error> {
        Ok(vec![
            ScoreDistribution::new(
                1,
                vec![
                    ObjectScoreDistribution::from_scores(10, 1, vec![0.0, 0.5, 0.5, 1.0])?,
                    ObjectScoreDistribution::from_scores(20, 1, vec![2.0])?,
                ],
            )?,
            ScoreDistribution::new(
                2,
                vec![ObjectScoreDistribution::from_scores(
                    10,
                    2,
                    vec![0.25, 0.75],
                )?],
            )?,
        ])
    }

    fn write(resolution: Option<usize>) -> Result<String, anyhow::Error> {
        let mut writer = TextScoreDistributionWriter::new(Vec::new(), resolution)?;
        for dist in distributions()? {
            writer.write(&dist)?;
        }
        Ok(String::from_utf8(writer.into_inner()?)?)
    }

    #[test]
    fn write_text() -> Result<(), anyhow::Error> {
        let text = write(None)?;

        assert_eq!(
            text,
            "#numTerms\tentrezId\tsampleSize\tdistribution\n\
             1\t10\t4\t0:0.25,0.5:0.75,1:1\n\
             1\t20\t1\t2:1\n\
             2\t10\t2\t0.25:0.5,0.75:1\n"
        );

        Ok(())
    }

    #[test]
    fn write_resampled_text() -> Result<(), anyhow::Error> {
        let text = write(Some(2))?;

        assert_eq!(
            text.lines().nth(1),
            Some("1\t10\t4\t0:0.25,0.5:0.75,1:1")
        );
        assert_eq!(text.lines().nth(2), Some("1\t20\t1\t2:1,2:1,2:1"));

        Ok(())
    }

    #[test]
    fn read_all() -> Result<(), anyhow::Error> {
        let text = write(None)?;

        let all = TextScoreDistributionReader::new(text.as_bytes())?.read_all()?;

        assert_eq!(all.values().cloned().collect::<Vec<_>>(), distributions()?);

        Ok(())
    }

    #[test]
    fn read_for_term_count_and_object() -> Result<(), anyhow::Error> {
        let text = write(None)?;
        let reader = || TextScoreDistributionReader::new(text.as_bytes());

        let dist = reader()?.read_for_term_count_and_object(2, 10)?;
        assert_eq!(dist.cumulative_frequencies(), &[(0.25, 0.5), (0.75, 1.0)]);

        assert!(reader()?.read_for_term_count_and_object(2, 20).is_err());
        assert!(reader()?.read_for_term_count(3).is_err());

        Ok(())
    }

    #[test]
    fn read_existing_file_format() -> Result<(), anyhow::Error> {
        let text = "#numTerms\tentrezId\tsampleSize\tdistribution\n\
                    1\t2200\t4\t0.0:0.25,0.5:0.75,1.0:1.0\n";

        let dist = TextScoreDistributionReader::new(text.as_bytes())?
            .read_for_term_count_and_object(1, 2200)?;

        assert_eq!(dist.sample_size(), 4);
        assert_eq!(
            dist.cumulative_frequencies(),
            &[(0.0, 0.25), (0.5, 0.75), (1.0, 1.0)]
        );

        Ok(())
    }

    #[rstest::rstest]
    #[case("#numTerms\tobjectId\tsampleSize\tdistribution\n")]
    #[case("numTerms\tentrezId\tsampleSize\tdistribution\n")]
    #[case("#numTerms\tentrezId\tsampleSize\n")]
    fn invalid_header(#[case] text: &str) {
        assert!(TextScoreDistributionReader::new(text.as_bytes()).is_err());
    }

    #[test]
    fn invalid_row() {
        let text = "#numTerms\tentrezId\tsampleSize\tdistribution\n1\t10\t4\t0.5-1.0\n";

        let res = TextScoreDistributionReader::new(text.as_bytes()).and_then(|r| r.read_all());

        assert!(res.is_err());
    }

    #[rstest::rstest]
    #[case("scoredist.tsv")]
    #[case("scoredist.tsv.gz")]
    fn file_round_trip(#[case] filename: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        {
            let mut writer = TextScoreDistributionWriter::create(tmp_dir.join(filename), None)?;
            for dist in distributions()? {
                writer.write(&dist)?;
            }
            writer.into_inner()?.flush()?;
        }

        let dist = TextScoreDistributionReader::open(tmp_dir.join(filename))?.read_for_term_count(1)?;

        assert_eq!(dist.object_ids().collect::<Vec<_>>(), vec![10, 20]);

        Ok(())
    }
}
