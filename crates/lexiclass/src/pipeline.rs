use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use lexiclass_cache::{DefinitionStore, UnknownStore};
use lexiclass_text::{
    FrequencyTable, TagError, Tagger, deduplicate, is_eligible, normalize, rank, title_case,
};
use lexiclass_types::{Category, Resolution, Token, WordRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::client::DictionaryClient;
use crate::config::OutputSettings;
use crate::format::{format_definitions, format_examples};
use crate::resolver::{ResolveError, Resolver};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("input directory {}: {source}", .path.display())]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no .txt files in {}", .0.display())]
    NoInputFiles(PathBuf),
    #[error("failed to write {}: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Cache(#[from] ResolveError),
}

#[derive(Debug, Error)]
enum FileError {
    #[error("read failed: {0}")]
    Read(#[from] io::Error),
    #[error(transparent)]
    Tag(#[from] TagError),
}

/// What a run did, for the final status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub files_processed: usize,
    pub files_skipped: usize,
    pub known_words: usize,
    pub unknown_words: usize,
    pub remote_lookups: usize,
}

/// Eligible words of one file in document order, with their counts.
#[derive(Debug, Default)]
struct FileWords {
    tokens: Vec<Token>,
    counts: FrequencyTable,
}

/// Words gathered from every input file.
#[derive(Debug, Default)]
struct Corpus {
    categories: BTreeMap<Category, Vec<String>>,
    all: FrequencyTable,
}

impl Corpus {
    fn absorb(&mut self, words: FileWords) {
        self.all.merge(&words.counts);
        for token in words.tokens {
            self.categories
                .entry(token.category)
                .or_default()
                .push(token.phrase);
        }
    }
}

/// Classifies a directory of text files and writes the per-category lists,
/// explanations and example sentences.
pub struct Pipeline<T, C, D, U> {
    tagger: T,
    resolver: Resolver<C, D, U>,
    output: OutputSettings,
    rng: StdRng,
    resolved: HashMap<String, Resolution>,
}

impl<T, C, D, U> Pipeline<T, C, D, U>
where
    T: Tagger,
    C: DictionaryClient,
    D: DefinitionStore,
    U: UnknownStore,
{
    pub fn new(tagger: T, resolver: Resolver<C, D, U>, output: OutputSettings) -> Self {
        Self {
            tagger,
            resolver,
            output,
            rng: StdRng::from_os_rng(),
            resolved: HashMap::new(),
        }
    }

    /// Fix the example sampling sequence.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn resolver(&self) -> &Resolver<C, D, U> {
        &self.resolver
    }

    pub fn into_resolver(self) -> Resolver<C, D, U> {
        self.resolver
    }

    pub async fn run(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<RunSummary, PipelineError> {
        let files = collect_input_files(input_dir)?;
        info!("found {} text files in {}", files.len(), input_dir.display());
        fs::create_dir_all(output_dir).map_err(|source| PipelineError::Output {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut summary = RunSummary {
            output_dir: output_dir.to_path_buf(),
            ..RunSummary::default()
        };
        let mut corpus = Corpus::default();
        for file in &files {
            match self.classify_file(file) {
                Ok(words) => {
                    debug!(
                        "{}: {} words, {} distinct",
                        file.display(),
                        words.tokens.len(),
                        words.counts.len()
                    );
                    corpus.absorb(words);
                    summary.files_processed += 1;
                }
                Err(err) => {
                    warn!("skipping {}: {err}", file.display());
                    summary.files_skipped += 1;
                }
            }
        }

        self.resolved.clear();
        let lookups_before = self.resolver.remote_lookups();
        let mut unknown_words = Vec::new();

        for category in Category::ALL {
            let Some(words) = corpus.categories.get(&category) else {
                debug!("no words in {category}");
                continue;
            };
            let ranked = deduplicate(rank(words));
            let mut outputs = OutputFiles::create(output_dir, category.label(), &self.output)?;
            for word in &ranked {
                match self.resolve_once(word).await? {
                    Resolution::Known(record) => outputs.write_word(
                        word,
                        &record,
                        &self.output,
                        &mut self.rng,
                    )?,
                    Resolution::Unknown => unknown_words.push(title_case(word)),
                }
            }
            outputs.finish()?;
            info!("category {category} processed: {} words", ranked.len());
        }

        let ranked = deduplicate(corpus.all.ranked());
        let mut outputs = OutputFiles::create(output_dir, "AllWords", &self.output)?;
        for word in &ranked {
            match self.resolve_once(word).await? {
                Resolution::Known(record) => {
                    summary.known_words += 1;
                    outputs.write_word(word, &record, &self.output, &mut self.rng)?;
                }
                Resolution::Unknown => unknown_words.push(title_case(word)),
            }
        }
        outputs.finish()?;

        let unknown_words = deduplicate(unknown_words);
        summary.unknown_words = unknown_words.len();
        let path = output_dir.join("UnknownWords.txt");
        let mut writer = create_output(&path)?;
        for word in &unknown_words {
            writeln!(writer, "{word}").map_err(|source| output_error(&path, source))?;
        }
        writer
            .flush()
            .map_err(|source| output_error(&path, source))?;

        summary.remote_lookups = self.resolver.remote_lookups() - lookups_before;
        Ok(summary)
    }

    /// Tag one file and keep its eligible words. Nothing reaches the corpus
    /// unless the whole file reads and tags.
    fn classify_file(&self, path: &Path) -> Result<FileWords, FileError> {
        let text = fs::read_to_string(path)?;
        let mut words = FileWords::default();
        for tagged in self.tagger.tag(&text)? {
            let category = Category::from_tag(&tagged.tag);
            for phrase in normalize(&tagged.text) {
                if !is_eligible(&phrase) {
                    continue;
                }
                words.counts.add(&phrase);
                words.tokens.push(Token { phrase, category });
            }
        }
        Ok(words)
    }

    async fn resolve_once(&mut self, word: &str) -> Result<Resolution, ResolveError> {
        let key = word.to_lowercase();
        if let Some(resolution) = self.resolved.get(&key) {
            return Ok(resolution.clone());
        }
        let resolution = self.resolver.resolve(&key).await?;
        self.resolved.insert(key, resolution.clone());
        Ok(resolution)
    }
}

/// `<Category>.txt` plus the optional `_ex` and `_es` companions.
struct OutputFiles {
    list: (PathBuf, BufWriter<File>),
    explanations: Option<(PathBuf, BufWriter<File>)>,
    examples: Option<(PathBuf, BufWriter<File>)>,
}

impl OutputFiles {
    fn create(dir: &Path, stem: &str, options: &OutputSettings) -> Result<Self, PipelineError> {
        let open = |suffix: &str| -> Result<(PathBuf, BufWriter<File>), PipelineError> {
            let path = dir.join(format!("{stem}{suffix}.txt"));
            let writer = create_output(&path)?;
            Ok((path, writer))
        };
        Ok(Self {
            list: open("")?,
            explanations: options
                .generate_explanations
                .then(|| open("_ex"))
                .transpose()?,
            examples: options
                .generate_example_sentences
                .then(|| open("_es"))
                .transpose()?,
        })
    }

    fn write_word(
        &mut self,
        word: &str,
        record: &WordRecord,
        options: &OutputSettings,
        rng: &mut StdRng,
    ) -> Result<(), PipelineError> {
        let (path, writer) = &mut self.list;
        writeln!(writer, "{}", title_case(word)).map_err(|source| output_error(path, source))?;

        if let Some((path, writer)) = &mut self.explanations {
            let text = format_definitions(word, record, options);
            writer
                .write_all(text.as_bytes())
                .map_err(|source| output_error(path, source))?;
        }
        if let Some((path, writer)) = &mut self.examples {
            let text = format_examples(word, record, options.max_example_sentences, rng);
            if !text.is_empty() {
                writer
                    .write_all(text.as_bytes())
                    .map_err(|source| output_error(path, source))?;
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<(), PipelineError> {
        for (path, mut writer) in [Some(self.list), self.explanations, self.examples]
            .into_iter()
            .flatten()
        {
            writer
                .flush()
                .map_err(|source| output_error(&path, source))?;
        }
        Ok(())
    }
}

fn create_output(path: &Path) -> Result<BufWriter<File>, PipelineError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| output_error(path, source))
}

fn output_error(path: &Path, source: io::Error) -> PipelineError {
    PipelineError::Output {
        path: path.to_path_buf(),
        source,
    }
}

/// Non-recursive `*.txt` listing (extension matched case-insensitively),
/// sorted by path.
pub fn collect_input_files(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let input_error = |source: io::Error| PipelineError::InputDirectory {
        path: dir.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(dir).map_err(input_error)?;
    if !metadata.is_dir() {
        return Err(input_error(io::Error::new(
            ErrorKind::NotADirectory,
            "not a directory",
        )));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(input_error)? {
        let path = entry.map_err(input_error)?.path();
        let is_txt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if is_txt && path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(PipelineError::NoInputFiles(dir.to_path_buf()));
    }
    files.sort();
    Ok(files)
}

/// `<input basename>_ewClassifiers`, next to wherever the tool is run.
pub fn default_output_dir(input_dir: &Path) -> PathBuf {
    let name = input_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            input_dir
                .canonicalize()
                .ok()
                .and_then(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| "inputs".to_string());
    PathBuf::from(format!("{name}_ewClassifiers"))
}
