use crate::prelude::*;

fn render_table(parameters: &ParameterSet) -> String {
    let headers = ["NAME", "DEFAULT", "TAG", "DESCRIPTION"];
    let rows = parameters
        .iter()
        .map(|p| {
            [
                p.name().to_owned(),
                p.default_value().to_owned(),
                p.metadata_tag().to_owned(),
                p.description().to_owned(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 4]| {
        let padded = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>();
        padded.join("  ").trim_end().to_owned()
    };

    let mut lines = vec![format_row(headers)];
    lines.extend(
        rows.iter()
            .map(|[name, default, tag, description]| {
                format_row([name.as_str(), default.as_str(), tag.as_str(), description.as_str()])
            }),
    );
    lines.join("\n")
}

fn render(kind: SamplerKind, json: bool) -> Result<String, CliError> {
    let parameters = kind.declared_parameters();
    if json {
        Ok(serde_json::to_string_pretty(&parameters)?)
    } else {
        Ok(render_table(&parameters))
    }
}

pub fn describe(args: DescribeArgs) -> Result<(), CliError> {
    println!("{}", render(args.sampler, args.json)?);
    Ok(())
}
