use anyhow::{anyhow, Context as _};
use reqwest::blocking::Client;

use crate::abs_path::AbsPathBuf;
use crate::config::FailurePolicy;
use crate::model::{ContestId, ContestListing, ProblemCode, ProblemRecord};
use crate::page::{ContestPageBuilder, ProblemPageBuilder};
use crate::persist::Persister;
use crate::pool::WorkerPool;
use crate::report::{ConsoleReporter, Report};
use crate::service::build_client;
use crate::{Config, Console, FetchError, Result};

#[derive(Debug)]
pub struct CodeforcesActor<'a> {
    client: Client,
    conf: &'a Config,
}

impl<'a> CodeforcesActor<'a> {
    pub fn new(conf: &'a Config) -> Result<Self> {
        let client = build_client(conf.user_agent())?;
        Ok(Self { client, conf })
    }

    /// Fetches the contest listing, then fetches and saves all of its problems.
    pub fn fetch(
        &self,
        contest_id: ContestId,
        author: &str,
        cnsl: &mut Console,
    ) -> Result<ContestListing> {
        let listing = self.fetch_listing(contest_id, cnsl)?;
        let reporter = ConsoleReporter::new(cnsl);
        self.fetch_problems(&listing, author, &reporter)?;
        Ok(listing)
    }

    pub fn fetch_listing(
        &self,
        contest_id: ContestId,
        cnsl: &mut Console,
    ) -> Result<ContestListing> {
        let contest_page = ContestPageBuilder::new(contest_id, self.conf)
            .build(&self.client, cnsl)
            .context("Could not fetch contest page")?;
        Ok(contest_page.extract_listing(self.conf.fetch().max_problem_code_len()))
    }

    pub fn fetch_problem(
        &self,
        contest_id: ContestId,
        code: &ProblemCode,
    ) -> Result<ProblemRecord> {
        let problem_page = ProblemPageBuilder::new(contest_id, code, self.conf)
            .build(&self.client)
            .context("Could not fetch problem page")?;
        Ok(problem_page.extract_problem())
    }

    /// Fetches and saves every problem of `listing` on the worker pool.
    ///
    /// Failures of single problems go to `reporter` and never cancel the others.
    /// Under the strict policy an error is returned after all problems were processed.
    pub fn fetch_problems(
        &self,
        listing: &ContestListing,
        author: &str,
        reporter: &dyn Report,
    ) -> Result<()> {
        let fetch_conf = self.conf.fetch();
        let pool = WorkerPool::new(fetch_conf.workers())?;
        let contest_dir = self.create_contest_dir(listing)?;
        let persister = Persister::new(self.conf, *listing.id(), author);

        reporter.start(listing);
        let results = pool.run_all(listing.problem_codes().iter().collect(), |code| {
            let result = self
                .fetch_problem(*listing.id(), code)
                .and_then(|record| persister.save(&contest_dir, &record, reporter));
            match result {
                Ok(true) => {
                    reporter.saved(code);
                    true
                }
                // failed writes were already reported by persister
                Ok(false) => {
                    reporter.failed(code);
                    false
                }
                Err(err) => {
                    reporter.warn(code, &err);
                    reporter.failed(code);
                    false
                }
            }
        });
        reporter.finish();

        let n_failed = results.iter().filter(|is_ok| !**is_ok).count();
        if n_failed > 0 && fetch_conf.failure_policy() == FailurePolicy::Strict {
            return Err(anyhow!(
                "Could not fetch {} of {} problems",
                n_failed,
                results.len()
            ));
        }
        Ok(())
    }

    fn create_contest_dir(&self, listing: &ContestListing) -> Result<AbsPathBuf> {
        let contest_dir = self.conf.output_abs_dir()?.join(listing.name());
        contest_dir
            .create_dir_all()
            .map_err(|source| FetchError::Persist {
                path: contest_dir.as_ref().to_owned(),
                source,
            })?;
        Ok(contest_dir)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::Mutex;

    use httpmock::prelude::*;
    use tempfile::{tempdir, TempDir};

    use super::*;
    use crate::Error;

    static CONTEST_HTML: &str = r#"<html><body>
<div class="rtable"><table><tr><th class="left">Codeforces Round: 885</th></tr></table></div>
<select name="submittedProblemIndex">
  <option value="">Choose problem</option>
  <option value="A">A - Alpha</option>
  <option value="B">B - Beta</option>
  <option value="B">B - Beta</option>
  <option value="C12">C12 - Gamma</option>
</select>
</body></html>"#;

    fn problem_html(statement: &str) -> String {
        format!(
            r#"<html><body><div class="problem-statement">
<div><p>{}</p></div>
<div class="input-specification"><p>One integer n.</p></div>
<div class="output-specification"><p>Print n.</p></div>
<div class="sample-tests">
  <div class="input"><pre><div>5</div></pre></div>
  <div class="output"><pre>5
</pre></div>
</div>
</div></body></html>"#,
            statement
        )
    }

    #[derive(Default)]
    struct RecordingReporter {
        saved: Mutex<Vec<ProblemCode>>,
        warned: Mutex<Vec<ProblemCode>>,
        failed: Mutex<Vec<ProblemCode>>,
    }

    impl Report for RecordingReporter {
        fn saved(&self, code: &ProblemCode) {
            self.saved.lock().unwrap().push(code.clone());
        }

        fn warn(&self, code: &ProblemCode, _err: &Error) {
            self.warned.lock().unwrap().push(code.clone());
        }

        fn failed(&self, code: &ProblemCode) {
            self.failed.lock().unwrap().push(code.clone());
        }
    }

    fn setup(
        server: &MockServer,
        fetch_conf: &str,
        extra_conf: &str,
    ) -> anyhow::Result<(TempDir, Config)> {
        let test_dir = tempdir()?;
        let base_dir = AbsPathBuf::try_new(test_dir.path())?;
        fs::write(
            base_dir.join("cfgen.yaml").as_ref(),
            format!(
                "base_url: {}\nfetch:\n  workers: 2\n{}{}",
                server.base_url(),
                fetch_conf,
                extra_conf
            ),
        )?;
        let conf = Config::load(Some(base_dir), &mut Console::sink())?;
        Ok((test_dir, conf))
    }

    #[test]
    fn fetch_saves_all_problems() -> anyhow::Result<()> {
        let server = MockServer::start();
        let contest_mock = server.mock(|when, then| {
            when.method(GET).path("/contest/1850");
            then.status(200).body(CONTEST_HTML);
        });
        let problem_a_mock = server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/A");
            then.status(200).body(problem_html("Alpha statement."));
        });
        let problem_b_mock = server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/B");
            then.status(200).body(problem_html("Beta statement."));
        });
        let (test_dir, conf) = setup(&server, "", "")?;

        let mut cnsl = Console::buf();
        let actor = CodeforcesActor::new(&conf)?;
        let listing = actor.fetch(ContestId::new(1850), "tourist", &mut cnsl)?;

        contest_mock.assert();
        problem_a_mock.assert();
        problem_b_mock.assert();
        assert_eq!(listing.name(), "Codeforces Round 885");
        assert_eq!(
            listing.problem_codes(),
            &vec![ProblemCode::from("A"), ProblemCode::from("B")]
        );

        let contest_dir = test_dir.path().join("Codeforces Round 885");
        for code in &["A", "B"] {
            let problem_dir = contest_dir.join(code);
            for file_name in &[
                "problemStatement.txt",
                "inputf.in",
                "expectedf.out",
                "outputf.out",
                "solution.cpp",
            ] {
                assert!(problem_dir.join(file_name).is_file(), "{}/{}", code, file_name);
            }
            assert_eq!(fs::read_to_string(problem_dir.join("inputf.in"))?, "5");
            assert_eq!(fs::read_to_string(problem_dir.join("expectedf.out"))?, "5");
        }
        let statement = fs::read_to_string(contest_dir.join("B").join("problemStatement.txt"))?;
        assert!(statement.starts_with("Problem Statement :-\n\nBeta statement.\n"));

        let output = cnsl.take_output()?;
        assert!(output.contains("/contest/1850 ... 200 OK"));
        assert!(output.contains("Contest: Codeforces Round 885 | Problems: 2"));
        assert!(!output.contains("WARN"));
        Ok(())
    }

    #[test]
    fn fetch_in_quiet_mode_writes_only_warnings() -> anyhow::Result<()> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/contest/1850");
            then.status(200).body(CONTEST_HTML);
        });
        server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/A");
            then.status(200).body(problem_html("Alpha statement."));
        });
        server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/B");
            then.status(503);
        });
        let (_test_dir, conf) = setup(&server, "", "")?;

        let mut cnsl = Console::buf().with_quiet(true);
        let actor = CodeforcesActor::new(&conf)?;
        actor.fetch(ContestId::new(1850), "tourist", &mut cnsl)?;

        let output = cnsl.take_output()?;
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 1, "{}", output);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("Problem B"));
        Ok(())
    }

    #[test]
    fn fetch_fails_without_writing_if_listing_fails() -> anyhow::Result<()> {
        let server = MockServer::start();
        let contest_mock = server.mock(|when, then| {
            when.method(GET).path("/contest/1850");
            then.status(404);
        });
        let (test_dir, conf) = setup(&server, "", "")?;

        let mut cnsl = Console::buf();
        let actor = CodeforcesActor::new(&conf)?;
        let err = actor
            .fetch(ContestId::new(1850), "tourist", &mut cnsl)
            .unwrap_err();

        contest_mock.assert();
        let status = err.downcast_ref::<FetchError>().and_then(FetchError::status);
        assert_eq!(status, Some(reqwest::StatusCode::NOT_FOUND));
        let n_entries = fs::read_dir(test_dir.path())?
            .filter(|entry| entry.as_ref().map(|e| e.path().is_dir()).unwrap_or(true))
            .count();
        assert_eq!(n_entries, 0);
        Ok(())
    }

    fn fetch_with_failing_problem(
        fetch_conf: &str,
    ) -> anyhow::Result<(TempDir, RecordingReporter, Result<()>)> {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/A");
            then.status(200).body(problem_html("Alpha statement."));
        });
        let problem_b_mock = server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/B");
            then.status(503);
        });
        server.mock(|when, then| {
            when.method(GET).path("/contest/1850/problem/C");
            then.status(200).body(problem_html("Gamma statement."));
        });
        let (test_dir, conf) = setup(&server, fetch_conf, "")?;

        let listing = ContestListing::new(
            ContestId::new(1850),
            "Round",
            vec!["A".into(), "B".into(), "C".into()],
        );
        let reporter = RecordingReporter::default();
        let actor = CodeforcesActor::new(&conf)?;
        let result = actor.fetch_problems(&listing, "tourist", &reporter);

        problem_b_mock.assert();
        Ok((test_dir, reporter, result))
    }

    #[test]
    fn fetch_problems_best_effort() -> anyhow::Result<()> {
        let (test_dir, reporter, result) = fetch_with_failing_problem("")?;
        assert!(result.is_ok());

        let mut saved = reporter.saved.into_inner().unwrap();
        saved.sort();
        assert_eq!(saved, vec![ProblemCode::from("A"), ProblemCode::from("C")]);
        assert_eq!(reporter.warned.into_inner().unwrap(), vec![ProblemCode::from("B")]);
        assert_eq!(reporter.failed.into_inner().unwrap(), vec![ProblemCode::from("B")]);

        let contest_dir = test_dir.path().join("Round");
        assert!(contest_dir.join("A").join("solution.cpp").is_file());
        assert!(contest_dir.join("C").join("solution.cpp").is_file());
        assert!(!contest_dir.join("B").exists());
        Ok(())
    }

    #[test]
    fn fetch_problems_strict() -> anyhow::Result<()> {
        let (test_dir, reporter, result) = fetch_with_failing_problem("  failure_policy: strict\n")?;
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "Could not fetch 1 of 3 problems");

        // siblings were still processed
        assert_eq!(reporter.saved.into_inner().unwrap().len(), 2);
        assert!(test_dir.path().join("Round").join("C").join("inputf.in").is_file());
        Ok(())
    }

    #[test]
    fn fetch_problems_with_empty_listing() -> anyhow::Result<()> {
        let server = MockServer::start();
        let (test_dir, conf) = setup(&server, "", "output_dir: out\n")?;

        let listing = ContestListing::new(ContestId::new(1850), "Empty", vec![]);
        let reporter = RecordingReporter::default();
        CodeforcesActor::new(&conf)?.fetch_problems(&listing, "tourist", &reporter)?;

        assert!(test_dir.path().join("out").join("Empty").is_dir());
        assert!(reporter.saved.into_inner().unwrap().is_empty());
        Ok(())
    }
}
