use anyhow::Result;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};
use translation_resolver::config::Config;
use translation_resolver::i18n::{
    AcceptLanguage, LoggingTranslator, TranslationResolver, TranslationStore, Translator,
};

/// Process-wide resolver, built on first use from the configuration.
static RESOLVER: OnceLock<TranslationResolver> = OnceLock::new();

fn default_resolver(config: &Config) -> &'static TranslationResolver {
    RESOLVER.get_or_init(|| {
        let (store, report) = TranslationStore::load(config.sources());
        if !report.is_clean() {
            warn!(
                "{} translation resource(s) could not be loaded",
                report.failures.len()
            );
        }

        let resolver = TranslationResolver::new(Arc::new(store));
        if let Some(default) = &config.default_language {
            resolver.set_default_language(default);
        }
        if let Some(language) = &config.language {
            resolver.set_language(language);
        }
        resolver
    })
}

fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translation_resolver=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let preference = config
        .accept_language
        .as_deref()
        .map(AcceptLanguage::parse)
        .transpose()?;

    let translator = LoggingTranslator::new(default_resolver(&config));
    info!(
        "Resolving with language {:?}, default {:?}, preference {:?}",
        translator.language(),
        translator.default_language(),
        preference.as_ref().map(|p| p.as_str())
    );

    for key in std::env::args().skip(1) {
        let value = match &preference {
            Some(preference) => translator.get_preferred_or_key(&key, preference),
            None => translator.get_or_key(&key),
        };
        println!("{} = {}", key, value);
    }

    let report = translator.inner().metrics().report();
    info!(
        "{} lookup(s): {} exact, {} default fallback(s), {} miss(es)",
        report.lookups, report.exact_hits, report.default_fallbacks, report.misses
    );
    Ok(())
}
