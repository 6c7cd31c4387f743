mod common;

use common::{
    bgv_parameters, bgv_session, ckks_parameters, ckks_session, decrypt_integer, decrypt_real,
    encrypt_integers, encrypt_reals,
};
use lhe::{Error, RelinPolicy};

#[test]
fn sum_of_three_integers() {
    let par = bgv_parameters(2);
    let session = bgv_session(&par, 2, &[RelinPolicy::Eager]);
    let cts = encrypt_integers(&session, &par, &[2, 3, 4]);
    let sum = session.evaluate_add_chain(&cts).unwrap();
    assert_eq!(sum.degree(), 1);
    assert_eq!(sum.level(), 0);
    assert_eq!(session.provider().relinearizations(), 0);
    assert_eq!(session.provider().rescales(), 0);
    assert_eq!(session.provider().additions(), 2);
    assert_eq!(decrypt_integer(&session, sum), 9);
}

#[test]
fn sum_wraps_around_the_plaintext_modulus() {
    let par = bgv_parameters(2);
    let session = bgv_session(&par, 2, &[RelinPolicy::Eager]);
    let cts = encrypt_integers(&session, &par, &[65536, 65536, 3]);
    let sum = session.evaluate_add_chain(&cts).unwrap();
    assert_eq!(decrypt_integer(&session, sum), 1);
}

#[test]
fn approximate_sum() {
    let par = ckks_parameters();
    let session = ckks_session(&par, 2);
    let cts = encrypt_reals(&session, &par, &[6.0, 2.0, 3.0]);
    let sum = session.evaluate_add_chain(&cts).unwrap();
    assert_eq!(sum.scale(), Some(2f64.powi(40)));
    let value = decrypt_real(&session, sum);
    assert!((value - 11.0).abs() < 1e-6, "{value} is not close to 11");
}

#[test]
fn circuit_runs_both_chains() {
    let par = bgv_parameters(2);
    let session = bgv_session(&par, 3, &[RelinPolicy::Deferred]);
    let cts = encrypt_integers(&session, &par, &[2, 3, 4]);
    let output = session
        .evaluate_circuit(&cts, RelinPolicy::Deferred)
        .unwrap();
    assert_eq!(decrypt_integer(&session, output.product), 24);
    assert_eq!(decrypt_integer(&session, output.sum), 9);

    // The inputs are left untouched.
    assert!(cts.iter().all(|ct| ct.level() == 0 && ct.degree() == 1));
}

#[test]
fn level_mismatch() {
    let par = bgv_parameters(3);
    let session = bgv_session(&par, 2, &[RelinPolicy::Eager]);
    let cts = encrypt_integers(&session, &par, &[2, 3]);
    let product = session
        .evaluate_multiply_chain(&cts, RelinPolicy::Eager)
        .unwrap();
    assert_eq!(product.level(), 1);

    assert!(matches!(
        session.evaluate_add_chain(&[product.clone(), cts[0].clone()]),
        Err(Error::LevelMismatch(1, 0))
    ));
    assert!(matches!(
        session.evaluate_add_chain(&[cts[0].clone(), product]),
        Err(Error::LevelMismatch(0, 1))
    ));
    assert_eq!(session.provider().additions(), 0);
}

#[test]
fn scale_mismatch() {
    let par = ckks_parameters();
    let session = ckks_session(&par, 3);
    let cts = encrypt_reals(&session, &par, &[1.5, 2.0, 3.0]);
    let square = session
        .evaluate_multiply_chain(&cts[..2], RelinPolicy::Eager)
        .unwrap();
    let cube = session
        .evaluate_multiply_chain(&cts, RelinPolicy::Eager)
        .unwrap();
    assert_eq!(square.level(), cube.level());
    assert!(matches!(
        session.evaluate_add_chain(&[square, cube]),
        Err(Error::ScaleMismatch(_, _))
    ));
}
