// Multiply and add three encrypted numbers with the `lhe` evaluator.
//
// With the integer family the numbers are reduced modulo 65537; with the
// approximate family they are encoded as fixed-point reals. Each of the
// `--rounds` extra multiplications consumes one more level; with too few
// `--moduli` the evaluator rejects the round before touching the ciphertexts.

mod util;

use clap::{Parser, ValueEnum};
use lhe::{EvaluatorSession, RelinPolicy, SchemeProfile, TrackedCiphertext};
use lhe_rlwe::{Ciphertext, Encoding, Plaintext, RlweParameters, RlweProvider};
use lhe_traits::{FheDecoder, FheEncoder, SchemeFamily};
use rand::thread_rng;
use std::error::Error;
use util::timeit::timeit;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scheme {
    Bgv,
    Ckks,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Eager,
    Deferred,
}

impl From<Policy> for RelinPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Eager => RelinPolicy::Eager,
            Policy::Deferred => RelinPolicy::Deferred,
        }
    }
}

#[derive(Parser)]
struct Cli {
    #[arg(
        num_args = 3,
        help = "The three numbers to multiply and add",
        default_values = ["6", "2", "3"],
        allow_negative_numbers = true
    )]
    values: Vec<f64>,

    #[arg(long, value_enum, help = "The scheme family", default_value = "bgv")]
    scheme: Scheme,

    #[arg(
        long,
        value_enum,
        help = "When to relinearize the product",
        default_value = "deferred"
    )]
    policy: Policy,

    #[arg(long, help = "The degree of the polynomials", default_value = "64")]
    degree: usize,

    #[arg(
        long,
        help = "The number of 60-bit moduli in the chain (bgv only)",
        default_value = "2",
        value_parser = clap::value_parser!(u8).range(2..=8)
    )]
    moduli: u8,

    #[arg(
        long,
        help = "How many more times to multiply the product by the first number",
        default_value = "0"
    )]
    rounds: usize,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Cli::parse();
    let mut rng = thread_rng();

    let params = timeit!(
        "Parameters generation",
        match args.scheme {
            Scheme::Bgv => RlweParameters::bgv_arc(args.moduli as usize, args.degree)?,
            Scheme::Ckks => RlweParameters::ckks_arc(args.degree)?,
        }
    );
    println!("# Three operands with lhe");
    println!("\tfamily = {}", params.family());
    println!("\tdegree = {}", params.degree());
    println!("\tmoduli_sizes = {:?}", params.moduli_sizes());
    if let Some(t) = params.plaintext() {
        println!("\tplaintext_modulus = {t}");
    }
    if let Some(scale) = params.scale() {
        println!("\tscale = 2^{}", scale.log2());
    }
    println!("\tpolicy = {}", RelinPolicy::from(args.policy));

    let provider = RlweProvider::new(&params);
    let profile = SchemeProfile::for_provider(&provider, params.max_relin_degree())?;
    let session = timeit!(
        "Key generation",
        EvaluatorSession::with_policies(profile, provider, &[args.policy.into()], &mut rng)?
    );

    let cts = timeit!("Encryption", {
        let mut cts = Vec::with_capacity(3);
        for value in &args.values {
            let pt = match params.family() {
                SchemeFamily::IntegerPacked => {
                    if value.fract() != 0.0 || *value < 0.0 {
                        log::error!("Expected a natural number, found {value}");
                        clap::Error::new(clap::error::ErrorKind::InvalidValue).exit();
                    }
                    Plaintext::try_encode(&[*value as u64] as &[u64], Encoding::integer(), &params)?
                }
                SchemeFamily::ApproximateFixedPoint => {
                    Plaintext::try_encode(&[*value] as &[f64], Encoding::real(), &params)?
                }
            };
            cts.push(session.encrypt(&pt, &mut rng)?);
        }
        cts
    });

    let mut product = timeit!(
        "Multiplication chain",
        session.evaluate_multiply_chain(&cts, args.policy.into())?
    );
    for round in 1..=args.rounds {
        product = match session
            .evaluate_multiply_chain(&[product, cts[0].clone()], args.policy.into())
        {
            Ok(product) => product,
            Err(e) => {
                log::error!("Round {round} failed: {e}");
                return Err(e.into());
            }
        };
    }
    println!(
        "\tdegree = {}, level = {}",
        product.degree(),
        product.level()
    );
    let sum = timeit!("Addition chain", session.evaluate_add_chain(&cts)?);

    let product = timeit!("Decryption", decrypt(&session, product)?);
    let sum = decrypt(&session, sum)?;
    println!("product = {product}");
    println!("sum = {sum}");

    Ok(())
}

fn decrypt(
    session: &EvaluatorSession<RlweProvider>,
    ct: TrackedCiphertext<Ciphertext>,
) -> Result<String, Box<dyn Error>> {
    let pt = session.decrypt(ct)?;
    Ok(match session.profile().family() {
        SchemeFamily::IntegerPacked => {
            Vec::<u64>::try_decode(&pt, Encoding::integer())?[0].to_string()
        }
        SchemeFamily::ApproximateFixedPoint => {
            format!("{:.4}", Vec::<f64>::try_decode(&pt, Encoding::real())?[0])
        }
    })
}
