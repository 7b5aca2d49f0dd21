use roundbell_core::{fields_for, TimerConfig, TimerMode};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    for mode in TimerMode::ALL {
        println!("{:<8} {}", mode.as_str(), mode.title());
        println!("         {}", mode.description());
        let preset = TimerConfig::defaults_for(mode);
        let fields: Vec<String> = fields_for(mode)
            .into_iter()
            .map(|(field, label)| format!("{label}: {}", field.display(preset.get(field))))
            .collect();
        println!("         {}", fields.join(", "));
    }
    Ok(())
}
