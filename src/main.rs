use std::env;

use softraster::{render_model, CameraParams, Model, ShadingMode};

const USAGE: &str = "usage: softraster <model.obj> <camera.txt> <width> <height> <out-image> [mode]

modes: default, white, flat, gouraud, gouraud_z, barycentric, barycentric_z
       (also accepted: --default, --white, --norm_flat, --norm_gouraud,
        --norm_gouraud_z, --norm_bary, --norm_bary_z)";

struct Args {
    model: String,
    camera: String,
    width: u32,
    height: u32,
    output: String,
    mode: ShadingMode,
}

fn parse_dimension(name: &str, value: &str) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(format!("{name} must be a positive integer, got {value:?}")),
    }
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    if args.iter().any(|a| a == "-h" || a == "--help") {
        return Err(USAGE.to_string());
    }
    let [model, camera, width, height, output, rest @ ..] = args else {
        return Err(USAGE.to_string());
    };
    let mode = match rest {
        [] => ShadingMode::default(),
        [mode] => mode.parse().map_err(|e| format!("{e}\n\n{USAGE}"))?,
        _ => return Err(USAGE.to_string()),
    };

    Ok(Args {
        model: model.clone(),
        camera: camera.clone(),
        width: parse_dimension("width", width)?,
        height: parse_dimension("height", height)?,
        output: output.clone(),
        mode,
    })
}

fn main() -> Result<(), String> {
    env_logger::init();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = parse_args(&argv)?;

    let model = Model::from_obj(&args.model).map_err(|e| e.to_string())?;
    let camera = CameraParams::from_file(&args.camera).map_err(|e| e.to_string())?;
    log::info!(
        "rendering {} ({} shapes) at {}x{} with {} shading",
        args.model,
        model.shapes().len(),
        args.width,
        args.height,
        args.mode
    );

    let raster = render_model(&model, &camera, args.width, args.height, args.mode)
        .map_err(|e| e.to_string())?;
    raster.save(&args.output).map_err(|e| e.to_string())?;

    log::info!("wrote {}", args.output);
    Ok(())
}
