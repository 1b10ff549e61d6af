use super::*;
use crate::CLUSTER_FILE_EXTENSION;
use colored::Colorize;
use dialoguer::Confirm;
use dialoguer::Input;
use dialoguer::Select;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;

/// Interactive menu over a [`Client`].
/// Server rejections are shown and the menu resumes;
/// any other failure ends the console.
pub struct Console<T> {
    client: Client<T>,
}

impl<T> Console<T>
where
    T: AsyncRead + AsyncWrite,
{
    pub fn new(client: Client<T>) -> Self {
        Self { client }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            let choice = Select::new()
                .with_prompt("qtcluster")
                .items(&[
                    "Load clusters from file",
                    "Discover clusters from table",
                    "Quit",
                ])
                .default(1)
                .interact()?;
            let outcome = match choice {
                0 => self.restore().await,
                1 => self.discover().await,
                _ => return Ok(()),
            };
            if let Err(e) = outcome {
                match e.downcast_ref::<Rejected>() {
                    Some(rejected) => println!("{}", rejected.to_string().red()),
                    None => return Err(e),
                }
            }
        }
    }

    async fn restore(&mut self) -> anyhow::Result<()> {
        let file = Input::<String>::new()
            .with_prompt("Cluster file")
            .interact_text()?;
        let summary = self.client.load(&file).await?;
        println!("{}", summary.green());
        Ok(())
    }

    async fn discover(&mut self) -> anyhow::Result<()> {
        let table = Input::<String>::new()
            .with_prompt("Table")
            .interact_text()?;
        let dump = self.client.select(&table).await?;
        println!("{}", dump);
        loop {
            let radius = Self::radius()?;
            let (n, report) = match self.client.cluster(radius).await {
                Ok(found) => found,
                Err(e) if e.is::<Rejected>() => {
                    println!("{}", e.to_string().red());
                    continue;
                }
                Err(e) => return Err(e),
            };
            println!("{}", format!("{} clusters", n).bold());
            println!("{}", report.green());
            let file = Input::<String>::new()
                .with_prompt("Save as")
                .default(format!("{}{}.{}", table, radius, CLUSTER_FILE_EXTENSION))
                .interact_text()?;
            self.client.save(&file).await?;
            println!("{}", format!("saved {}", file).dimmed());
            if !Confirm::new()
                .with_prompt("Run again with another radius?")
                .default(false)
                .interact()?
            {
                return Ok(());
            }
        }
    }

    fn radius() -> anyhow::Result<f64> {
        let radius = Input::<String>::new()
            .with_prompt("Radius")
            .validate_with(|s: &String| -> Result<(), String> {
                match s.trim().parse::<f64>() {
                    Ok(r) if r > 0. && r.is_finite() => Ok(()),
                    _ => Err(String::from("Enter a number greater than 0")),
                }
            })
            .interact_text()?;
        Ok(radius.trim().parse::<f64>()?)
    }
}
