/*!
 * End-to-end translation tests with the bundled phrasebook model
 */

use anyhow::Result;
use traduire::app_config::Config;
use traduire::model_provider::ModelProvider;
use traduire::translation::TranslationService;
use traduire::translation::reassembler::is_printable;
use crate::common;

async fn bundled_service(concurrent_requests: usize) -> Result<TranslationService> {
    let mut config = Config::default();
    config.model.path = common::bundled_model_path();
    config.concurrent_requests = concurrent_requests;

    let translator = ModelProvider::new(config.clone()).translator().await?;
    Ok(TranslationService::from_config(translator, &config))
}

/// Test known sentences, word-by-word fallback and layout together
#[tokio::test]
async fn test_pipeline_withBundledModel_shouldTranslateAndKeepLayout() -> Result<()> {
    let service = bundled_service(1).await?;

    let text = "Bonjour.\n\nj'ai toujours voulu être un oiseau. le chat dort";
    let output = service.translate(text).await?;

    assert_eq!(output, "Hello.\n\nI have always wanted to be a bird. The cat sleeps.");
    Ok(())
}

/// Test normalization lets untidy input hit stored sentences
#[tokio::test]
async fn test_pipeline_withUntidyQuestion_shouldMatchStoredSentence() -> Result<()> {
    let service = bundled_service(1).await?;

    assert_eq!(service.translate("comment allez-vous?").await?, "How are you?");
    assert_eq!(service.translate("Où est la gare?  Merci beaucoup.").await?, "Where is the station?  Thank you very much.");

    Ok(())
}

/// Test the output never contains characters outside the printable set
#[tokio::test]
async fn test_pipeline_withAccentedUnknownWords_shouldOnlyEmitPrintable() -> Result<()> {
    let service = bundled_service(1).await?;

    let output = service.translate("Le café est très grand. Élodie mange une pomme.").await?;

    assert!(output.chars().all(is_printable), "{output:?}");
    assert_eq!(output, "The caf is very big. lodie eat a apple.");

    Ok(())
}

/// Test concurrent translation gives the same text as sequential
#[tokio::test]
async fn test_pipeline_concurrent_shouldMatchSequential() -> Result<()> {
    let text = "Bonjour. Il pleut. Le chien mange une pomme rouge. Je ne sais pas.\tAu revoir.";

    let sequential = bundled_service(1).await?.translate(text).await?;
    let concurrent = bundled_service(3).await?.translate(text).await?;

    assert_eq!(sequential, concurrent);
    assert_eq!(
        sequential,
        "Hello. It is raining. The dog eat a apple red. I don't know.\tGoodbye."
    );

    Ok(())
}

/// Test the abbreviation guard keeps titles inside their sentence
#[tokio::test]
async fn test_pipeline_withAbbreviation_shouldTranslateOneUnit() -> Result<()> {
    let service = bundled_service(1).await?;

    let output = service.translate_with_progress("Mr. Smith mange.", |_, _| {}, None).await?;

    assert_eq!(output.sentences, vec!["Mr. Smith mange."]);
    assert_eq!(output.text, "Mr. Smith eat.");

    Ok(())
}
