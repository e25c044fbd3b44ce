use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher as _};
use std::sync::Mutex;

use anyhow::{anyhow, Context as _};
use heck::{CamelCase as _, KebabCase as _, MixedCase as _, SnakeCase as _};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tera::Tera;

use crate::model::{ContestId, ProblemCode};
use crate::Result;

macro_rules! register_case_conversion {
    ($renderer:ident, $case_name:expr, $func:ident) => {
        let filter_name = format!("{}_case", $case_name);
        $renderer.register_filter(
            &filter_name,
            |value: &tera::Value, _: &HashMap<String, tera::Value>| {
                let s =
                    tera::try_get_value!(format!("{}_case", $case_name), "value", String, value);
                tera::to_value(s.$func()).map_err(|e| {
                    tera::Error::chain(
                        format!("Could not convert \"{}\" to {} case", s, $case_name),
                        e,
                    )
                })
            },
        )
    };
}

lazy_static! {
    static ref RENDERER: Mutex<Tera> = {
        let mut renderer = Tera::default();
        register_case_conversion!(renderer, "camel", to_mixed_case);
        register_case_conversion!(renderer, "pascal", to_camel_case);
        register_case_conversion!(renderer, "snake", to_snake_case);
        register_case_conversion!(renderer, "kebab", to_kebab_case);

        Mutex::new(renderer)
    };
}

fn calc_hash<H: Hash>(h: H) -> String {
    let mut hasher = DefaultHasher::new();
    h.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

pub trait Expand<'a> {
    type Context: Serialize + 'a;

    fn get_template(&self) -> &str;

    fn expand(&self, context: &Self::Context) -> Result<String> {
        let template = self.get_template();
        let template_name = calc_hash(template);

        let ctx =
            tera::Context::from_serialize(context).context("Could not create template context")?;

        let mut renderer = RENDERER
            .lock()
            .map_err(|_| anyhow!("Could not lock template renderer"))?;
        if let Err(err) = renderer.get_template(&template_name) {
            if let tera::ErrorKind::TemplateNotFound(_) = err.kind {
                // need to register template because this is the first time to use it
                renderer
                    .add_raw_template(&template_name, template)
                    .context("Could not parse template")?;
            } else {
                return Err(err).context("Could not expand template");
            }
        };
        renderer.render(&template_name, &ctx).with_context(|| {
            format!(
                "Could not expand template with context\n    template: {}\n    context: {}",
                template,
                serde_json::to_string(context).unwrap_or_default()
            )
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolutionContext<'a> {
    author: &'a str,
    created: &'a str,
    #[serde(rename = "contest")]
    contest_id: ContestId,
    #[serde(rename = "problem")]
    problem_code: &'a ProblemCode,
}

impl<'a> SolutionContext<'a> {
    pub fn new(
        author: &'a str,
        created: &'a str,
        contest_id: ContestId,
        problem_code: &'a ProblemCode,
    ) -> Self {
        Self {
            author,
            created,
            contest_id,
            problem_code,
        }
    }
}

/// Template of the generated solution source file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SolutionTempl(String);

impl SolutionTempl {
    const DEFAULT: &'static str = include_str!("../resources/solution.cpp.tera");
}

impl Default for SolutionTempl {
    fn default() -> Self {
        Self::from(Self::DEFAULT)
    }
}

impl<'a> Expand<'a> for SolutionTempl {
    type Context = SolutionContext<'a>;

    fn get_template(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for SolutionTempl {
    fn from(s: T) -> Self {
        Self(s.into())
    }
}

impl fmt::Display for SolutionTempl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}
