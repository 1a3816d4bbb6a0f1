use log::info;

use evolv_core::error::ChainError;
use evolv_core::model::markov_chain::MarkovChain;

const LYRICS: &str = "the sun goes up the hill and the sun goes down the hill and the moon goes up";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // A chain remembering 1 previous word: predictions depend on the last
    // two words. A fixed seed makes the run reproducible
    let mut chain: MarkovChain<String> = MarkovChain::with_seed(1, 42)?;

    // Nothing learned yet, the chain has no current state
    match chain.predict_state(true) {
        Err(ChainError::UninitializedState) => println!("No state yet, feed the chain first"),
        other => println!("Should not happen: {other:?}"),
    }

    // Learn the lyrics without moving the chain, then choose where to start
    let words: Vec<String> = LYRICS.split_whitespace().map(str::to_owned).collect();
    chain.feed_sequence(&words, false)?;
    info!("{} distinct words learned", chain.state_count());

    // Memory is given oldest first and read back latest first
    chain.set_memory(["the".to_owned(), "sun".to_owned()]);
    println!("Memory: {:?}", chain.memory()?);

    // Peek at the next word without moving
    println!("Next word could be: {}", chain.predict_state(false)?);

    // Walk the chain; the walk stops early if it reaches the end of the lyrics
    let walk = chain.generate(12)?;
    println!("Generated: the sun {}", walk.join(" "));

    // Words never seen during training have no continuation
    chain.set_memory(["starry".to_owned(), "night".to_owned()]);
    match chain.predict_state(true) {
        Err(ChainError::NoObservedTransitions) => println!("'starry night' was never followed by anything"),
        other => println!("Should not happen: {other:?}"),
    }

    // A memoryless chain only looks at the current word
    let mut simple: MarkovChain<&str> = MarkovChain::with_seed(0, 7)?;
    simple.feed_sequence(LYRICS.split_whitespace(), true)?;
    simple.update_memory(&"moon");
    println!("After 'moon': {}", simple.predict_state(false)?);

    // Continue a learned sequence, then generate 10 words
    simple.update_memory_many(["the", "hill"]);
    for i in 0..10 {
        match simple.predict_state(true) {
            Ok(word) => println!("Generated word {}: {}", i + 1, word),
            Err(ChainError::NoObservedTransitions) => break,
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
