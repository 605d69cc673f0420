pub mod bayes;
